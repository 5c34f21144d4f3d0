use marl_geom::Vec3;
use marl_materials::MaterialId;

/// Geometry accumulated over one meshing pass. `pos`, `norm`, `uv`, and
/// `mat` are parallel per-vertex arrays; `idx` lists triangle corners three
/// at a time. Rebuilt from scratch every pass; holds no state across edits.
#[derive(Default, Clone, Debug)]
pub struct MeshBuild {
    pub pos: Vec<Vec3>,
    pub norm: Vec<Vec3>,
    pub uv: Vec<[f32; 2]>,
    pub mat: Vec<MaterialId>,
    pub idx: Vec<u32>,
}

impl MeshBuild {
    /// Clears all arrays but retains capacity for reuse across passes.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.norm.clear();
        self.uv.clear();
        self.mat.clear();
        self.idx.clear();
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.idx.len() / 3
    }

    /// Resolves `point` to a vertex index, reusing any previously emitted
    /// vertex with exactly equal coordinates. New vertices take a
    /// `(material, 0)` uv and a parallel material index.
    // PERF: O(n) scan per insert; hash quantized coordinates if chunk sizes grow.
    pub fn vertex_for_point(&mut self, point: Vec3, material: MaterialId) -> u32 {
        for (i, v) in self.pos.iter().enumerate() {
            if *v == point {
                return i as u32;
            }
        }
        self.pos.push(point);
        self.uv.push([material.0 as f32, 0.0]);
        self.mat.push(material);
        (self.pos.len() - 1) as u32
    }

    /// Smooth normals from the triangle list: accumulate the (area-weighted)
    /// face normal of every triangle onto its corners, then normalize.
    pub fn recompute_normals(&mut self) {
        self.norm.clear();
        self.norm.resize(self.pos.len(), Vec3::ZERO);
        for tri in self.idx.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let face = (self.pos[b] - self.pos[a]).cross(self.pos[c] - self.pos[a]);
            self.norm[a] += face;
            self.norm[b] += face;
            self.norm[c] += face;
        }
        for n in &mut self.norm {
            *n = n.normalized();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_for_point_dedups_exact_matches() {
        let mut build = MeshBuild::default();
        let a = build.vertex_for_point(Vec3::new(1.0, 2.0, 3.0), MaterialId(0));
        let b = build.vertex_for_point(Vec3::new(0.5, 0.0, 0.0), MaterialId(1));
        let c = build.vertex_for_point(Vec3::new(1.0, 2.0, 3.0), MaterialId(2));
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(build.vertex_count(), 2);
        // The first emitter's material sticks; a deduped hit never rewrites it
        assert_eq!(build.mat[a as usize], MaterialId(0));
        assert_eq!(build.uv[a as usize], [0.0, 0.0]);
        assert_eq!(build.uv[b as usize], [1.0, 0.0]);
    }

    #[test]
    fn clear_keep_capacity_empties_every_array() {
        let mut build = MeshBuild::default();
        build.vertex_for_point(Vec3::ZERO, MaterialId(0));
        build.idx.extend_from_slice(&[0, 0, 0]);
        build.recompute_normals();
        build.clear_keep_capacity();
        assert_eq!(build.vertex_count(), 0);
        assert_eq!(build.triangle_count(), 0);
        assert!(build.norm.is_empty() && build.uv.is_empty() && build.mat.is_empty());
    }

    #[test]
    fn recompute_normals_matches_face_orientation() {
        let mut build = MeshBuild::default();
        // One triangle in the XZ plane wound so the face normal points +Y
        build.vertex_for_point(Vec3::new(0.0, 0.0, 0.0), MaterialId(0));
        build.vertex_for_point(Vec3::new(0.0, 0.0, 1.0), MaterialId(0));
        build.vertex_for_point(Vec3::new(1.0, 0.0, 0.0), MaterialId(0));
        build.idx.extend_from_slice(&[0, 1, 2]);
        build.recompute_normals();
        assert_eq!(build.norm.len(), 3);
        for n in &build.norm {
            assert!((n.y - 1.0).abs() < 1e-6, "expected +Y normal, got {n:?}");
            assert!(n.x.abs() < 1e-6 && n.z.abs() < 1e-6);
        }
    }
}
