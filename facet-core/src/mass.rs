//! Mass, center of mass and inertia tensor of a closed triangle mesh.
//!
//! Uses the boundary-integral method of Brian Mirtich, "Fast and Accurate
//! Computation of Polyhedral Mass Properties", journal of graphics tools,
//! volume 1, number 2, 1996. Volume integrals are reduced to surface
//! integrals over each face, and those to line integrals over the face's
//! edges projected onto a coordinate plane, so the result is exact for any
//! closed polyhedron.
//!
//! The mesh must be closed and every triangle must be wound the same way.
//! Neither is checked: an open or inconsistently wound mesh gives a
//! meaningless result rather than an error.

use nalgebra::{Matrix3, Point3, Vector3};
use tracing::{debug, instrument, warn};

use crate::error::{FacetError, Result};
use crate::geometry::MeshBuffer;

/// How triangle vertex order relates to the outward direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Winding {
    /// Counter-clockwise when seen from outside.
    #[default]
    CounterClockwise,
    /// Clockwise when seen from outside. Each triangle is read in reverse.
    Clockwise,
}

/// Mass properties of a uniform-density solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    pub mass: f64,
    pub density: f64,
    /// Enclosed volume, independent of density.
    pub volume: f64,
    pub center_of_mass: Point3<f64>,
    /// Inertia tensor about the origin of the mesh frame.
    pub inertia: Matrix3<f64>,
}

impl MassProperties {
    /// Enclosed volume.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Inertia tensor about the center of mass (parallel axis theorem).
    pub fn inertia_about_center_of_mass(&self) -> Matrix3<f64> {
        let d = self.center_of_mass.coords;
        let shift = self.mass * (Matrix3::identity() * d.dot(&d) - d * d.transpose());
        self.inertia - shift
    }
}

/// Per-face integrals, indexed relative to the face's projection axes.
struct FaceIntegrals {
    fa: f64,
    fb: f64,
    fc: f64,
    faa: f64,
    fbb: f64,
    fcc: f64,
    faaa: f64,
    fbbb: f64,
    fccc: f64,
    faab: f64,
    fbbc: f64,
    fcca: f64,
}

/// Integrals over the face projected onto the (A, B) plane.
#[derive(Default)]
struct ProjectionIntegrals {
    p1: f64,
    pa: f64,
    pb: f64,
    paa: f64,
    pab: f64,
    pbb: f64,
    paaa: f64,
    paab: f64,
    pabb: f64,
    pbbb: f64,
}

fn projection_integrals(v: &[Vector3<f64>; 3], a: usize, b: usize) -> ProjectionIntegrals {
    let mut p = ProjectionIntegrals::default();

    for j in 0..3 {
        let (a0, b0) = (v[j][a], v[j][b]);
        let (a1, b1) = (v[(j + 1) % 3][a], v[(j + 1) % 3][b]);
        let da = a1 - a0;
        let db = b1 - b0;

        let a0_2 = a0 * a0;
        let a0_3 = a0_2 * a0;
        let a0_4 = a0_3 * a0;
        let b0_2 = b0 * b0;
        let b0_3 = b0_2 * b0;
        let b0_4 = b0_3 * b0;
        let a1_2 = a1 * a1;
        let a1_3 = a1_2 * a1;
        let b1_2 = b1 * b1;
        let b1_3 = b1_2 * b1;

        let c1 = a1 + a0;
        let ca = a1 * c1 + a0_2;
        let caa = a1 * ca + a0_3;
        let caaa = a1 * caa + a0_4;
        let cb = b1 * (b1 + b0) + b0_2;
        let cbb = b1 * cb + b0_3;
        let cbbb = b1 * cbb + b0_4;
        let cab = 3.0 * a1_2 + 2.0 * a1 * a0 + a0_2;
        let kab = a1_2 + 2.0 * a1 * a0 + 3.0 * a0_2;
        let caab = a0 * cab + 4.0 * a1_3;
        let kaab = a1 * kab + 4.0 * a0_3;
        let cabb = 4.0 * b1_3 + 3.0 * b1_2 * b0 + 2.0 * b1 * b0_2 + b0_3;
        let kabb = b1_3 + 2.0 * b1_2 * b0 + 3.0 * b1 * b0_2 + 4.0 * b0_3;

        p.p1 += db * c1;
        p.pa += db * ca;
        p.paa += db * caa;
        p.paaa += db * caaa;
        p.pb += da * cb;
        p.pbb += da * cbb;
        p.pbbb += da * cbbb;
        p.pab += db * (b1 * cab + b0 * kab);
        p.paab += db * (b1 * caab + b0 * kaab);
        p.pabb += da * (a1 * cabb + a0 * kabb);
    }

    p.p1 /= 2.0;
    p.pa /= 6.0;
    p.paa /= 12.0;
    p.paaa /= 20.0;
    p.pb /= -6.0;
    p.pbb /= -12.0;
    p.pbbb /= -20.0;
    p.pab /= 24.0;
    p.paab /= 60.0;
    p.pabb /= -60.0;
    p
}

fn face_integrals(
    v: &[Vector3<f64>; 3],
    n: &Vector3<f64>,
    a: usize,
    b: usize,
    c: usize,
) -> FaceIntegrals {
    let p = projection_integrals(v, a, b);
    let (na, nb) = (n[a], n[b]);
    let w = -n.dot(&v[0]);

    let k1 = 1.0 / n[c];
    let k2 = k1 * k1;
    let k3 = k2 * k1;
    let k4 = k3 * k1;

    FaceIntegrals {
        fa: k1 * p.pa,
        fb: k1 * p.pb,
        fc: -k2 * (na * p.pa + nb * p.pb + w * p.p1),
        faa: k1 * p.paa,
        fbb: k1 * p.pbb,
        fcc: k3
            * (na * na * p.paa
                + 2.0 * na * nb * p.pab
                + nb * nb * p.pbb
                + w * (2.0 * (na * p.pa + nb * p.pb) + w * p.p1)),
        faaa: k1 * p.paaa,
        fbbb: k1 * p.pbbb,
        fccc: -k4
            * (na * na * na * p.paaa
                + 3.0 * na * na * nb * p.paab
                + 3.0 * na * nb * nb * p.pabb
                + nb * nb * nb * p.pbbb
                + 3.0 * w * (na * na * p.paa + 2.0 * na * nb * p.pab + nb * nb * p.pbb)
                + w * w * (3.0 * (na * p.pa + nb * p.pb) + w * p.p1)),
        faab: k1 * p.paab,
        fbbc: -k2 * (na * p.pabb + nb * p.pbbb + w * p.pbb),
        fcca: k3
            * (na * na * p.paaa
                + 2.0 * na * nb * p.paab
                + nb * nb * p.pabb
                + w * (2.0 * (na * p.paa + nb * p.pab) + w * p.pa)),
    }
}

/// Compute mass, center of mass and inertia about the origin for a closed
/// mesh of uniform `density`.
///
/// Returns [`FacetError::ZeroVolume`] when the enclosed volume is zero (an
/// empty, flat or open-and-cancelling mesh) instead of dividing by it.
#[instrument(skip(mesh), fields(triangles = mesh.triangle_count()))]
pub fn compute_mass_properties(
    mesh: &MeshBuffer,
    density: f64,
    winding: Winding,
) -> Result<MassProperties> {
    if !density.is_finite() {
        return Err(FacetError::InvalidDensity(density));
    }

    let mut t0 = 0.0;
    let mut t1 = Vector3::<f64>::zeros();
    let mut t2 = Vector3::<f64>::zeros();
    let mut tp = Vector3::<f64>::zeros();
    let mut skipped = 0usize;

    for [p0, p1, p2] in mesh.triangles() {
        let v = match winding {
            Winding::CounterClockwise => [p0.coords, p1.coords, p2.coords],
            Winding::Clockwise => [p2.coords, p1.coords, p0.coords],
        };

        let n = (v[1] - v[0]).cross(&(v[2] - v[0]));
        let (nx, ny, nz) = (n.x.abs(), n.y.abs(), n.z.abs());
        let c = if nx > ny && nx > nz {
            0
        } else if ny > nz {
            1
        } else {
            2
        };

        // zero-area triangle: adjacent faces carry its share
        if n[c] == 0.0 {
            skipped += 1;
            continue;
        }
        let a = (c + 1) % 3;
        let b = (a + 1) % 3;

        let f = face_integrals(&v, &n, a, b, c);

        t0 += n.x
            * if a == 0 {
                f.fa
            } else if b == 0 {
                f.fb
            } else {
                f.fc
            };

        t1[a] += n[a] * f.faa;
        t1[b] += n[b] * f.fbb;
        t1[c] += n[c] * f.fcc;
        t2[a] += n[a] * f.faaa;
        t2[b] += n[b] * f.fbbb;
        t2[c] += n[c] * f.fccc;
        tp[a] += n[a] * f.faab;
        tp[b] += n[b] * f.fbbc;
        tp[c] += n[c] * f.fcca;
    }

    t1 /= 2.0;
    t2 /= 3.0;
    tp /= 2.0;

    if skipped > 0 {
        warn!(skipped, "skipped zero-area triangles");
    }
    debug!(volume = t0, "integrated mesh");
    if t0 == 0.0 || !t0.is_finite() {
        return Err(FacetError::ZeroVolume);
    }

    let rho = density;
    let inertia = Matrix3::new(
        rho * (t2.y + t2.z),
        -rho * tp.x,
        -rho * tp.z,
        -rho * tp.x,
        rho * (t2.z + t2.x),
        -rho * tp.y,
        -rho * tp.z,
        -rho * tp.y,
        rho * (t2.x + t2.y),
    );

    Ok(MassProperties {
        mass: rho * t0,
        density,
        volume: t0,
        center_of_mass: Point3::from(t1 / t0),
        inertia,
    })
}
