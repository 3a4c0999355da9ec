mod test_distance;
mod test_dtype;
mod test_partition;
mod test_sparse;
