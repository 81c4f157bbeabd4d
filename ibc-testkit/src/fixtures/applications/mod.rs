pub mod token_wrapper;
