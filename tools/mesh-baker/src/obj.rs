//! Wavefront OBJ writer for baked meshes
//!
//! Every vertex carries a position, UV and normal at the same index, so faces
//! are written as `f a/a/a b/b/b c/c/c` (OBJ indices are 1-based).

use std::io::{self, Write};

use bake_common::CombinedMesh;

/// Write `mesh` as a single OBJ object called `name`
pub fn write_obj<W: Write>(w: &mut W, name: &str, mesh: &CombinedMesh) -> io::Result<()> {
    writeln!(w, "# mesh-baker")?;
    writeln!(
        w,
        "# {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    )?;
    writeln!(w, "o {}", name)?;

    for v in &mesh.vertices {
        writeln!(w, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for uv in &mesh.uvs {
        writeln!(w, "vt {} {}", uv.x, uv.y)?;
    }
    for n in &mesh.normals {
        writeln!(w, "vn {} {} {}", n.x, n.y, n.z)?;
    }

    for tri in mesh.triangles.chunks_exact(3) {
        let [a, b, c] = [tri[0] + 1, tri[1] + 1, tri[2] + 1];
        writeln!(w, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
    }

    Ok(())
}
