use crate::Bench;
use ndspan::{Array, Dimension, Ix1, Ix2, Ix3, NdError, View};

fn sum_1d_view(x: View<f32, Ix1>) -> f32 {
    let mut sum = 0f32;
    for i in 0..x.dim(0) {
        sum += *x.at(i);
    }
    sum
}

fn sum_2d_view(x: View<f32, Ix2>) -> f32 {
    let mut sum = 0f32;
    for i in 0..x.dim(0) {
        for j in 0..x.dim(1) {
            sum += *x.at(i).at(j);
        }
    }
    sum
}

fn sum_3d_view(x: View<f32, Ix3>) -> f32 {
    let mut sum = 0f32;
    for i in 0..x.dim(0) {
        for j in 0..x.dim(1) {
            for k in 0..x.dim(2) {
                sum += *x.at(i).at(j).at(k);
            }
        }
    }
    sum
}

fn sum_1d_array(x: &Array<f32, Ix1>) -> f32 {
    let mut sum = 0f32;
    for i in 0..x.dim(0) {
        sum += x[i];
    }
    sum
}

fn sum_2d_array(x: &Array<f32, Ix2>) -> f32 {
    let mut sum = 0f32;
    for i in 0..x.dim(0) {
        for j in 0..x.dim(1) {
            sum += x[[i, j]];
        }
    }
    sum
}

fn sum_3d_array(x: &Array<f32, Ix3>) -> f32 {
    let mut sum = 0f32;
    for i in 0..x.dim(0) {
        for j in 0..x.dim(1) {
            for k in 0..x.dim(2) {
                sum += x[[i, j, k]];
            }
        }
    }
    sum
}

fn sum_3d_unchecked(x: View<f32, Ix3>) -> f32 {
    let mut sum = 0f32;
    for i in 0..x.dim(0) {
        for j in 0..x.dim(1) {
            for k in 0..x.dim(2) {
                // Indices are bounded by the shape
                sum += unsafe { *x.at_unchecked(i).at_unchecked(j).at_unchecked(k) };
            }
        }
    }
    sum
}

fn iter_sum<D: Dimension>(x: View<f32, D>) -> f32 {
    let mut sum = 0f32;
    for elem in x {
        sum += elem;
    }
    sum
}

pub fn run(bench: &mut Bench) -> Result<(), NdError> {
    for n in bench.sizes() {
        if bench.wants(&["sum_1d_view", "sum_1d_array", "sum_1d_iterators"], n) {
            let x = bench.random([n])?;
            bench.run("sum_1d_view", n, || sum_1d_view(x.view()));
            bench.run("sum_1d_array", n, || sum_1d_array(&x));
            bench.run("sum_1d_iterators", n, || iter_sum(x.view()));
        }
        if bench.wants(&["sum_2d_view", "sum_2d_array", "sum_2d_iterators"], n * n) {
            let x = bench.random([n, n])?;
            bench.run("sum_2d_view", n, || sum_2d_view(x.view()));
            bench.run("sum_2d_array", n, || sum_2d_array(&x));
            bench.run("sum_2d_iterators", n, || iter_sum(x.view()));
        }
        let names = ["sum_3d_view", "sum_3d_array", "sum_3d_unchecked", "sum_3d_iterators"];
        if bench.wants(&names, n * n * n) {
            let x = bench.random([n, n, n])?;
            bench.run("sum_3d_view", n, || sum_3d_view(x.view()));
            bench.run("sum_3d_array", n, || sum_3d_array(&x));
            bench.run("sum_3d_unchecked", n, || sum_3d_unchecked(x.view()));
            bench.run("sum_3d_iterators", n, || iter_sum(x.view()));
        }
    }
    Ok(())
}
