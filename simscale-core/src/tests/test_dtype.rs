use crate::dtype::{Cell, DType};
use crate::error::CoreError;
use crate::matrix::Dataset;

#[test]
fn test_dtype_parse_and_display() {
    assert_eq!("int32".parse::<DType>().unwrap(), DType::Int32);
    assert_eq!("boolean".parse::<DType>().unwrap(), DType::Bool);
    assert_eq!(DType::Float32.to_string(), "float32");
    assert!(matches!("object".parse::<DType>(), Err(CoreError::Type(_))));
    assert_eq!(DType::default(), DType::Float64);
}

#[test]
fn test_cell_conversions() {
    assert_eq!(Cell::Bool(true).convert(DType::Int32).unwrap(), 1.0);
    assert_eq!(Cell::Int(0).convert(DType::Bool).unwrap(), 0.0);
    assert_eq!(Cell::from("True").convert(DType::Bool).unwrap(), 1.0);
    assert!(Cell::Int(2).convert(DType::Bool).is_err());

    // i32 range is enforced
    assert!(Cell::Int(i64::from(i32::MAX) + 1).convert(DType::Int32).is_err());
    assert_eq!(Cell::Int(-5).convert(DType::Int32).unwrap(), -5.0);

    // u64 beyond i64 cannot become an integer, but can become a float
    assert!(Cell::UInt(u64::MAX).convert(DType::Int64).is_err());
    assert!(Cell::UInt(u64::MAX).convert(DType::Float64).is_ok());

    // float32 rounding is applied
    let v = Cell::Float(0.1).convert(DType::Float32).unwrap();
    assert_eq!(v, 0.1f32 as f64);
}

#[test]
fn test_dataset_from_rows_keeps_dtype() {
    let rows = vec![vec![1i32, 2, 3], vec![4, 5, 6]];
    let dataset = Dataset::from_rows(&rows).unwrap();

    assert_eq!(dataset.dtype(), DType::Int32);
    assert_eq!(dataset.shape(), (2, 3));
    assert_eq!(dataset.row(1), &[4.0, 5.0, 6.0]);

    let bools = Dataset::from_rows(&[vec![true, false]]).unwrap();
    assert_eq!(bools.dtype(), DType::Bool);
    assert!(bools.is_binary());
}

#[test]
fn test_dataset_ragged_rows_rejected() {
    let rows = vec![vec![1.0, 2.0], vec![3.0]];
    assert!(matches!(Dataset::from_rows(&rows), Err(CoreError::Shape(_))));

    assert!(matches!(
        Dataset::from_vec(vec![1.0f32; 5], 2, 3),
        Err(CoreError::Shape(_))
    ));
}

#[test]
fn test_dataset_normalise_and_select() {
    let dataset = Dataset::from_rows(&[vec![3.0, 4.0], vec![0.0, 0.0], vec![0.0, 2.0]]).unwrap();

    let norms = dataset.row_norms();
    assert_eq!(norms, vec![5.0, 0.0, 2.0]);

    let normalised = dataset.normalised_rows();
    assert!((normalised.row(0)[0] - 0.6).abs() < 1e-12);
    assert!((normalised.row(0)[1] - 0.8).abs() < 1e-12);
    assert_eq!(normalised.row(1), &[0.0, 0.0], "zero rows stay zero");

    let selected = dataset.select_rows(&[2, 0]).unwrap();
    assert_eq!(selected.shape(), (2, 2));
    assert_eq!(selected.row(0), &[0.0, 2.0]);
    assert!(matches!(
        dataset.select_rows(&[3]),
        Err(CoreError::Validation(_))
    ));

    let t = dataset.transpose();
    assert_eq!(t.shape(), (2, 3));
    assert_eq!(t.row(1), &[4.0, 0.0, 2.0]);
}

#[test]
fn test_int64_beyond_exact_range_rejected() {
    let exact = (1i64 << 53) - 1;
    let dataset = Dataset::from_rows(&[vec![exact, -exact]]).unwrap();
    assert_eq!(dataset.row(0), &[exact as f64, -exact as f64]);

    let too_big = (1i64 << 53) + 1;
    assert!(matches!(
        Dataset::from_rows(&[vec![0, too_big]]),
        Err(CoreError::Type(_))
    ));
    assert!(matches!(
        Dataset::from_vec(vec![1, -too_big], 1, 2),
        Err(CoreError::Type(_))
    ));
    assert!(Cell::Int(too_big).convert(DType::Int64).is_err());
    assert!(Cell::Int(too_big).convert(DType::Float64).is_ok());
}

#[test]
fn test_dataset_dimensions_follow_data() {
    let dataset = Dataset::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2).unwrap();

    assert_eq!(dataset.nrows(), 3);
    assert_eq!(dataset.ncols(), 2);
    assert_eq!(dataset.shape(), (3, 2));
    assert_eq!(dataset.rows().count(), 3);
    assert_eq!(dataset.row(2), &[5.0, 6.0]);
    assert_eq!(dataset.transpose().shape(), (2, 3));
}
