mod recv;
mod refund;
