use marl_mesh_cpu::tables::{CORNER_OFFSETS, EDGE_CORNERS, TRI_TABLE};

#[test]
fn empty_and_full_configurations_emit_nothing() {
    assert!(TRI_TABLE[0].iter().all(|&e| e == -1));
    assert!(TRI_TABLE[255].iter().all(|&e| e == -1));
}

#[test]
fn rows_are_sentinel_terminated_triangle_lists() {
    for (config, row) in TRI_TABLE.iter().enumerate() {
        let len = row.iter().position(|&e| e == -1).unwrap_or(row.len());
        assert_eq!(len % 3, 0, "config {config}: {len} edge slots");
        assert!(len <= 15, "config {config}: more than five triangles");
        // Nothing meaningful after the sentinel
        assert!(
            row[len..].iter().all(|&e| e == -1),
            "config {config}: data after sentinel"
        );
        assert!(
            row[..len].iter().all(|&e| (0..12).contains(&i32::from(e))),
            "config {config}: edge index out of range"
        );
    }
}

#[test]
fn edges_connect_adjacent_corners() {
    for (edge, [a, b]) in EDGE_CORNERS.iter().enumerate() {
        let ca = CORNER_OFFSETS[*a];
        let cb = CORNER_OFFSETS[*b];
        let differing = (0..3).filter(|&axis| ca[axis] != cb[axis]).count();
        assert_eq!(differing, 1, "edge {edge} must span exactly one axis");
    }
}

// Each row triangulates exactly the edges whose corners straddle the
// configuration's inside/outside split.
#[test]
fn rows_cover_exactly_the_cut_edges() {
    for config in 0..256usize {
        let mut expected = [false; 12];
        for (edge, [a, b]) in EDGE_CORNERS.iter().enumerate() {
            let bit_a = (config >> a) & 1;
            let bit_b = (config >> b) & 1;
            expected[edge] = bit_a != bit_b;
        }
        let mut used = [false; 12];
        for &slot in TRI_TABLE[config].iter().take_while(|&&e| e != -1) {
            used[slot as usize] = true;
        }
        assert_eq!(
            used, expected,
            "config {config}: triangulated edges disagree with cut edges"
        );
    }
}

#[test]
fn complementary_configurations_share_edge_sets() {
    for config in 0..256usize {
        let edges = |c: usize| {
            let mut set = [false; 12];
            for &slot in TRI_TABLE[c].iter().take_while(|&&e| e != -1) {
                set[slot as usize] = true;
            }
            set
        };
        assert_eq!(edges(config), edges(255 - config), "config {config}");
    }
}

#[test]
fn triangles_are_nondegenerate() {
    for (config, row) in TRI_TABLE.iter().enumerate() {
        let len = row.iter().position(|&e| e == -1).unwrap_or(row.len());
        for tri in row[..len].chunks_exact(3) {
            assert!(
                tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2],
                "config {config}: repeated edge in triangle {tri:?}"
            );
        }
    }
}
