use crate::Bench;
use itertools::iproduct;
use ndspan::{Array, Ix2, NdError, View, ViewMut};

fn check_shapes(a: [usize; 2], b: [usize; 2], c: [usize; 2]) {
    assert_eq!(a[0], c[0], "Rows of a and c differ");
    assert_eq!(a[1], b[0], "Columns of a and rows of b differ");
    assert_eq!(b[1], c[1], "Columns of b and c differ");
}

fn mul_views(a: View<f32, Ix2>, b: View<f32, Ix2>, mut c: ViewMut<f32, Ix2>) {
    check_shapes(a.shape(), b.shape(), c.shape());
    let (n, m, p) = (a.dim(0), a.dim(1), b.dim(1));
    for i in 0..n {
        let row = a.at(i);
        let mut out = c.at_mut(i);
        for j in 0..p {
            out[j] = 0.;
            for k in 0..m {
                out[j] += row[k] * *b.at(k).at(j);
            }
        }
    }
}

fn mul_arrays(a: &Array<f32, Ix2>, b: &Array<f32, Ix2>, c: &mut Array<f32, Ix2>) {
    check_shapes(a.shape(), b.shape(), c.shape());
    let m = a.dim(1);
    for (i, j) in iproduct!(0..a.dim(0), 0..b.dim(1)) {
        c[[i, j]] = 0.;
        for k in 0..m {
            c[[i, j]] += a[[i, k]] * b[[k, j]];
        }
    }
}

fn mul_slices(n: usize, m: usize, p: usize, a: &[f32], b: &[f32], c: &mut [f32]) {
    for i in 0..n {
        for j in 0..p {
            c[i * p + j] = 0.;
            for k in 0..m {
                c[i * p + j] += a[i * m + k] * b[k * p + j];
            }
        }
    }
}

pub fn run(bench: &mut Bench) -> Result<(), NdError> {
    let names = [
        "naive_matrix_mul_view",
        "naive_matrix_mul_array",
        "naive_matrix_mul_slices",
    ];
    for n in bench.sizes() {
        if !bench.wants(&names, n * n) {
            continue;
        }
        let a = bench.random([n, n])?;
        let b = bench.random([n, n])?;
        let mut c: Array<f32, Ix2> = Array::new([n, n])?;
        bench.run("naive_matrix_mul_view", n, || {
            mul_views(a.view(), b.view(), c.view_mut());
            c[[0, 0]]
        });
        bench.run("naive_matrix_mul_array", n, || {
            mul_arrays(&a, &b, &mut c);
            c[[0, 0]]
        });
        bench.run("naive_matrix_mul_slices", n, || {
            mul_slices(n, n, n, a.as_slice(), b.as_slice(), c.as_mut_slice());
            c[[0, 0]]
        });
    }
    Ok(())
}
