use marl_materials::{MaterialCatalog, MaterialId};

#[test]
fn ids_follow_sorted_key_order() {
    let catalog = MaterialCatalog::from_toml_str(
        r#"
        [materials]
        rock = ["assets/textures/rock.png"]
        grass = ["assets/textures/grass.png"]
        dirt = ["assets/textures/dirt.png"]
        "#,
    )
    .expect("catalog should parse");

    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.get_id("dirt"), Some(MaterialId(0)));
    assert_eq!(catalog.get_id("grass"), Some(MaterialId(1)));
    assert_eq!(catalog.get_id("rock"), Some(MaterialId(2)));
    assert_eq!(catalog.get_id("mud"), None);
}

#[test]
fn get_resolves_key_and_paths() {
    let catalog = MaterialCatalog::from_toml_str(
        r#"
        [materials]
        grass = ["assets/textures/grass.png", "assets/textures/grass_alt.png"]
        "#,
    )
    .expect("catalog should parse");

    let id = catalog.get_id("grass").unwrap();
    let mat = catalog.get(id).unwrap();
    assert_eq!(mat.key, "grass");
    assert_eq!(mat.id, id);
    assert_eq!(mat.texture_candidates.len(), 2);

    assert!(catalog.get(MaterialId(7)).is_none());
}

#[test]
fn empty_catalog_parses() {
    let catalog = MaterialCatalog::from_toml_str("[materials]\n").expect("catalog should parse");
    assert!(catalog.is_empty());
    assert_eq!(catalog.len(), 0);
}

#[test]
fn malformed_toml_is_an_error() {
    assert!(MaterialCatalog::from_toml_str("materials = 3").is_err());
    assert!(MaterialCatalog::from_toml_str("[materials]\ngrass = 1").is_err());
}
