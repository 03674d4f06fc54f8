#![allow(clippy::float_cmp)]

mod box_space;
mod categorical;
mod discrete;
mod equality;
mod product;
