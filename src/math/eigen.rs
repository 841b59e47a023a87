//! Real 3x3 matrix operations and eigenpair extraction
//!
//! The direct ellipse fit reduces to a 3x3 eigenproblem, which is small enough
//! to solve through the characteristic cubic rather than pulling in a full
//! linear algebra dependency. Roots are polished with Newton iterations to keep
//! eigenvector extraction stable when eigenvalue magnitudes differ widely.

/// Row-major 3x3 matrix of f64 values
pub type Mat3 = [[f64; 3]; 3];

/// A real eigenvalue with its unit-norm eigenvector
#[derive(Debug, Clone, Copy)]
pub struct EigenPair {
    /// The eigenvalue
    pub value: f64,
    /// The associated eigenvector, normalized to unit length
    pub vector: [f64; 3],
}

/// Matrix product a * b
pub fn multiply(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut result = [[0.0; 3]; 3];
    for (i, row) in result.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            let mut sum = 0.0;
            for k in 0..3 {
                sum += get(a, i, k) * get(b, k, j);
            }
            *cell = sum;
        }
    }
    result
}

/// Matrix transpose
pub fn transpose(a: &Mat3) -> Mat3 {
    let mut result = [[0.0; 3]; 3];
    for (i, row) in result.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = get(a, j, i);
        }
    }
    result
}

/// Matrix-vector product a * v
pub fn mat_vec(a: &Mat3, v: [f64; 3]) -> [f64; 3] {
    let mut result = [0.0; 3];
    for (i, out) in result.iter_mut().enumerate() {
        let mut sum = 0.0;
        for (k, component) in v.iter().enumerate() {
            sum += get(a, i, k) * component;
        }
        *out = sum;
    }
    result
}

/// Scale a matrix by a constant
pub fn scale(a: &Mat3, factor: f64) -> Mat3 {
    let mut result = *a;
    for row in &mut result {
        for cell in row {
            *cell *= factor;
        }
    }
    result
}

/// Determinant of the matrix
pub fn determinant(a: &Mat3) -> f64 {
    get(a, 0, 0) * (get(a, 1, 1) * get(a, 2, 2) - get(a, 1, 2) * get(a, 2, 1))
        - get(a, 0, 1) * (get(a, 1, 0) * get(a, 2, 2) - get(a, 1, 2) * get(a, 2, 0))
        + get(a, 0, 2) * (get(a, 1, 0) * get(a, 2, 1) - get(a, 1, 1) * get(a, 2, 0))
}

/// Matrix inverse via the adjugate
///
/// Returns None when the determinant is too small for a reliable inverse.
pub fn invert(a: &Mat3) -> Option<Mat3> {
    let det = determinant(a);
    if det.abs() < 1e-300 {
        return None;
    }

    let cofactor = |r1: usize, c1: usize, r2: usize, c2: usize| -> f64 {
        get(a, r1, c1) * get(a, r2, c2) - get(a, r1, c2) * get(a, r2, c1)
    };

    let adjugate: Mat3 = [
        [
            cofactor(1, 1, 2, 2),
            -cofactor(0, 1, 2, 2),
            cofactor(0, 1, 1, 2),
        ],
        [
            -cofactor(1, 0, 2, 2),
            cofactor(0, 0, 2, 2),
            -cofactor(0, 0, 1, 2),
        ],
        [
            cofactor(1, 0, 2, 1),
            -cofactor(0, 0, 2, 1),
            cofactor(0, 0, 1, 1),
        ],
    ];

    Some(scale(&adjugate, 1.0 / det))
}

/// Extract all real eigenpairs of a general real 3x3 matrix
///
/// Eigenvalues come from the characteristic cubic; complex conjugate pairs are
/// omitted. Eigenvectors are recovered from cross products of the rows of
/// M - lambda*I, choosing the most independent pair.
pub fn real_eigenpairs(m: &Mat3) -> Vec<EigenPair> {
    let trace = get(m, 0, 0) + get(m, 1, 1) + get(m, 2, 2);
    let minors = get(m, 0, 0) * get(m, 1, 1) - get(m, 0, 1) * get(m, 1, 0)
        + get(m, 0, 0) * get(m, 2, 2)
        - get(m, 0, 2) * get(m, 2, 0)
        + get(m, 1, 1) * get(m, 2, 2)
        - get(m, 1, 2) * get(m, 2, 1);
    let det = determinant(m);

    // Characteristic polynomial: lambda^3 - tr*lambda^2 + minors*lambda - det
    let roots = solve_cubic(-trace, minors, -det);

    roots
        .into_iter()
        .map(|value| EigenPair {
            value,
            vector: eigenvector_for(m, value),
        })
        .collect()
}

// Real roots of lambda^3 + b*lambda^2 + c*lambda + d
fn solve_cubic(b: f64, c: f64, d: f64) -> Vec<f64> {
    // Depressed cubic t^3 + p*t + q with lambda = t - b/3
    let shift = b / 3.0;
    let p = c - b * b / 3.0;
    let q = 2.0 * b * b * b / 27.0 - b * c / 3.0 + d;

    let discriminant = q * q / 4.0 + p * p * p / 27.0;

    let mut roots = Vec::new();
    if discriminant > 1e-12 * (q * q + p * p * p.abs()).abs().max(1e-300) {
        // One real root
        let sqrt_disc = discriminant.sqrt();
        let u = (-q / 2.0 + sqrt_disc).cbrt();
        let v = (-q / 2.0 - sqrt_disc).cbrt();
        roots.push(u + v - shift);
    } else if p.abs() < 1e-300 {
        // Triple root
        roots.push((-q).cbrt() - shift);
    } else {
        // Three real roots via the trigonometric method
        let r = (-p / 3.0).sqrt();
        let cos_arg = (3.0 * q / (2.0 * p * r)).clamp(-1.0, 1.0);
        let phi = cos_arg.acos();
        for k in 0..3 {
            let t = 2.0 * r * ((phi - 2.0 * std::f64::consts::PI * k as f64) / 3.0).cos();
            roots.push(t - shift);
        }
    }

    for root in &mut roots {
        *root = newton_polish(*root, b, c, d);
    }
    roots.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    roots
}

fn newton_polish(mut x: f64, b: f64, c: f64, d: f64) -> f64 {
    for _ in 0..3 {
        let f = ((x + b) * x + c) * x + d;
        let df = (3.0 * x + 2.0 * b) * x + c;
        if df.abs() < 1e-300 {
            break;
        }
        let step = f / df;
        if !step.is_finite() {
            break;
        }
        x -= step;
    }
    x
}

fn eigenvector_for(m: &Mat3, value: f64) -> [f64; 3] {
    let shifted: Mat3 = [
        [get(m, 0, 0) - value, get(m, 0, 1), get(m, 0, 2)],
        [get(m, 1, 0), get(m, 1, 1) - value, get(m, 1, 2)],
        [get(m, 2, 0), get(m, 2, 1), get(m, 2, 2) - value],
    ];

    let rows: [[f64; 3]; 3] = shifted;
    let candidates = [
        cross(rows[0], rows[1]),
        cross(rows[0], rows[2]),
        cross(rows[1], rows[2]),
    ];

    let mut best = [1.0, 0.0, 0.0];
    let mut best_norm = 0.0;
    for candidate in candidates {
        let norm = norm3(candidate);
        if norm > best_norm {
            best = candidate;
            best_norm = norm;
        }
    }

    if best_norm < 1e-300 {
        return [1.0, 0.0, 0.0];
    }
    [
        best[0] / best_norm,
        best[1] / best_norm,
        best[2] / best_norm,
    ]
}

const fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm3(v: [f64; 3]) -> f64 {
    v[2].mul_add(v[2], v[0].mul_add(v[0], v[1] * v[1])).sqrt()
}

fn get(a: &Mat3, i: usize, j: usize) -> f64 {
    a.get(i).and_then(|row| row.get(j)).copied().unwrap_or(0.0)
}
