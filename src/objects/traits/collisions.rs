use bevy::math::DVec2;

pub enum Shapes {
    Circle(f64), //radius
}

/// Overlap test shared by everything that occupies space in the simulation.
///
/// Touching is not overlapping: two circles collide only when the distance
/// between their centers is strictly below the sum of their radii.
pub trait CollisionDetection {
    fn get_position(&self) -> DVec2;
    fn get_hitbox(&self) -> Shapes;

    fn distance_to(&self, point: DVec2) -> f64 {
        self.get_position().distance(point)
    }

    fn collided(&self, other: &dyn CollisionDetection) -> bool {
        let my_hitbox = self.get_hitbox();

        let other_position = other.get_position();
        let other_hitbox = other.get_hitbox();

        let distance = self.distance_to(other_position);

        match my_hitbox {
            Shapes::Circle(r1) => match other_hitbox {
                Shapes::Circle(r2) => distance < r1 + r2,
            },
        }
    }
}
