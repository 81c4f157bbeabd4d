//! End-to-end tests of the token wrapper middleware live under `tests/`.
