#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use ndarray::Array1;
use salmon_run::simulation::error::SimError;
use salmon_run::simulation::field::{
    DEFAULT_FIELD_VECTOR, FIELD_RECORD_VERSION, FieldRecord, NavigationField,
};
use salmon_run::simulation::params::GridParams;

fn create_test_grid(width: usize, height: usize) -> GridParams {
    GridParams {
        width,
        height,
        cell_size: 2.0,
        origin: [-4.0, 0.0],
        limit_vectors_to_cell: false,
    }
}

fn patterned_field(grid: &GridParams) -> NavigationField {
    let mut field = NavigationField::new(grid);
    for y in 0..grid.height {
        for x in 0..grid.width {
            field
                .set_vector(x, y, [x as f32 * 0.5 - 1.0, y as f32 * 0.25])
                .unwrap();
        }
    }
    field
}

#[test]
fn test_new_field_is_default() {
    let grid = create_test_grid(4, 3);
    let field = NavigationField::new(&grid);
    for y in 0..3 {
        for x in 0..4 {
            assert_eq!(field.vector(x, y), Some(DEFAULT_FIELD_VECTOR));
        }
    }
    assert_eq!(field.vector(4, 0), None);
}

#[test]
fn test_row_major_indexing() {
    let field = NavigationField::new(&create_test_grid(5, 3));
    assert_eq!(field.index_of(0, 0), 0);
    assert_eq!(field.index_of(4, 0), 4);
    assert_eq!(field.index_of(0, 1), 5);
    assert_eq!(field.index_of(3, 2), 13);
    for index in 0..15 {
        let (x, y) = field.coords_of(index);
        assert_eq!(field.index_of(x, y), index);
    }
}

#[test]
fn test_vector_at_world_position() {
    let grid = create_test_grid(4, 3);
    let field = patterned_field(&grid);

    // cell (2, 1) spans x in [0, 2), y in [2, 4)
    let v = field.vector_at(&Array1::from_vec(vec![0.5, 3.9])).unwrap();
    assert_eq!(v.to_vec(), vec![0.0, 0.25]);

    let center = field.cell_center_world(2, 1);
    assert_eq!(center.to_vec(), vec![1.0, 3.0]);
}

#[test]
fn test_vector_at_out_of_bounds() {
    let field = NavigationField::new(&create_test_grid(4, 3));
    for pos in [[-4.1, 1.0], [4.0, 1.0], [0.0, -0.1], [0.0, 6.0]] {
        let result = field.vector_at(&Array1::from_vec(pos.to_vec()));
        assert!(matches!(result, Err(SimError::OutOfBounds { .. })), "{pos:?}");
    }
}

#[test]
fn test_set_vector_limits_to_cell() {
    let mut grid = create_test_grid(2, 2);
    grid.limit_vectors_to_cell = true;
    let mut field = NavigationField::new(&grid);

    field.set_vector(1, 1, [6.0, 8.0]).unwrap();
    let v = field.vector(1, 1).unwrap();
    assert!((v[0] - 1.2).abs() < 1e-5);
    assert!((v[1] - 1.6).abs() < 1e-5);

    assert!(field.set_vector(2, 0, [0.0, 0.0]).is_err());
}

#[test]
fn test_reset_restores_default() {
    let grid = create_test_grid(3, 3);
    let mut field = patterned_field(&grid);
    field.reset();
    assert_eq!(field, NavigationField::new(&grid));
}

#[test]
fn test_record_round_trip() {
    let grid = create_test_grid(6, 4);
    let field = patterned_field(&grid);

    let record = field.to_record("bends");
    assert_eq!(record.version, FIELD_RECORD_VERSION);
    assert_eq!(record.vectors.len(), 24);

    let json = serde_json::to_string(&record).unwrap();
    let parsed: FieldRecord = serde_json::from_str(&json).unwrap();
    let restored = NavigationField::from_record(&parsed, &grid);

    for y in 0..4 {
        for x in 0..6 {
            assert_eq!(restored.vector(x, y), field.vector(x, y));
        }
    }
}

#[test]
fn test_mismatched_record_falls_back_to_default() {
    let grid = create_test_grid(6, 4);
    let record = patterned_field(&grid).to_record("bends");

    let other_grid = create_test_grid(5, 4);
    let restored = NavigationField::from_record(&record, &other_grid);
    assert_eq!(restored, NavigationField::new(&other_grid));

    let mut truncated = record.clone();
    truncated.vectors.pop();
    assert_eq!(
        NavigationField::from_record(&truncated, &grid),
        NavigationField::new(&grid)
    );

    let mut future = record;
    future.version = FIELD_RECORD_VERSION + 1;
    assert_eq!(
        NavigationField::from_record(&future, &grid),
        NavigationField::new(&grid)
    );
}

#[test]
fn test_file_round_trip_and_bad_files() {
    let dir = std::env::temp_dir().join(format!("salmon_run_field_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let grid = create_test_grid(3, 5);
    let field = patterned_field(&grid);

    let path = dir.join("field.json");
    field.save_to_file("saved", &path).unwrap();
    assert_eq!(NavigationField::load_or_default(&path, &grid), field);

    let garbage = dir.join("garbage.json");
    std::fs::write(&garbage, "{ not json").unwrap();
    assert_eq!(
        NavigationField::load_or_default(&garbage, &grid),
        NavigationField::new(&grid)
    );

    let missing = dir.join("missing.json");
    assert_eq!(
        NavigationField::load_or_default(&missing, &grid),
        NavigationField::new(&grid)
    );

    std::fs::remove_dir_all(&dir).ok();
}
