pub mod blob_map;
