mod support;

mod input;
mod sibor;
mod window;
