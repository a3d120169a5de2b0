pub mod db;
pub mod health;
