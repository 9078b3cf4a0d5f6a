pub mod db;
pub mod enrollment;
