pub mod collisions;
