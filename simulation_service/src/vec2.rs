use std::str::FromStr;

use olamai_proto::{v1, ConversionError};

/// A cell position, or a region coordinate when produced by [`Vec2::region`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Region containing this position. Floor division, so `-1` belongs to
    /// region `-1` and `0` to region `0`.
    pub fn region(&self, region_size: i32) -> Vec2 {
        Vec2 {
            x: self.x.div_euclid(region_size),
            y: self.y.div_euclid(region_size),
        }
    }

    /// Whether at least one `i32` cell falls inside this region.
    pub fn is_region_in_bounds(&self, region_size: i32) -> bool {
        let size = i64::from(region_size);
        let covers_a_cell = |r: i32| {
            let first = i64::from(r) * size;
            first <= i64::from(i32::MAX) && first + size - 1 >= i64::from(i32::MIN)
        };
        covers_a_cell(self.x) && covers_a_cell(self.y)
    }

    /// The neighbouring cell, or `None` past the edge of the grid.
    pub fn step(&self, direction: Direction) -> Option<Vec2> {
        self.offset(direction.delta())
    }

    pub fn offset(&self, (dx, dy): (i32, i32)) -> Option<Vec2> {
        Some(Vec2 {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

impl From<v1::Region> for Vec2 {
    fn from(region: v1::Region) -> Self {
        Vec2::new(region.x, region.y)
    }
}

impl std::fmt::Display for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

impl FromStr for Direction {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UP" => Ok(Direction::Up),
            "DOWN" => Ok(Direction::Down),
            "LEFT" => Ok(Direction::Left),
            "RIGHT" => Ok(Direction::Right),
            other => Err(ConversionError::InvalidValue {
                item: "direction",
                expected: "one of UP, DOWN, LEFT, RIGHT",
                got: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Vec2::new(0, 0), Vec2::new(0, 0))]
    #[case(Vec2::new(15, 15), Vec2::new(0, 0))]
    #[case(Vec2::new(16, 0), Vec2::new(1, 0))]
    #[case(Vec2::new(-1, -1), Vec2::new(-1, -1))]
    #[case(Vec2::new(-16, -17), Vec2::new(-1, -2))]
    #[case(Vec2::new(-17, 31), Vec2::new(-2, 1))]
    fn region_of_position(#[case] pos: Vec2, #[case] expected: Vec2) {
        assert_eq!(pos.region(16), expected);
    }

    #[rstest]
    #[case(Vec2::new(0, 0), 16, true)]
    #[case(Vec2::new(-1, 2), 4, true)]
    #[case(Vec2::new(i32::MAX, 0), 16, false)]
    #[case(Vec2::new(0, i32::MIN), 16, false)]
    #[case(Vec2::new(i32::MAX, i32::MAX), 1, true)]
    #[case(Vec2::new(i32::MIN, i32::MIN), 1, true)]
    fn region_bounds(#[case] region: Vec2, #[case] size: i32, #[case] expected: bool) {
        assert_eq!(region.is_region_in_bounds(size), expected);
    }

    #[rstest]
    #[case(i32::MAX)]
    #[case(i32::MIN)]
    #[case(-17)]
    #[case(1_000_003)]
    fn every_cell_lies_in_a_bounded_region(#[case] coord: i32) {
        for size in [1, 10, 16, 7919] {
            let region = Vec2::new(coord, coord).region(size);
            assert!(region.is_region_in_bounds(size), "{coord} / {size}");
        }
    }

    #[rstest]
    #[case("UP", Vec2::new(0, 1))]
    #[case("DOWN", Vec2::new(0, -1))]
    #[case("LEFT", Vec2::new(-1, 0))]
    #[case("RIGHT", Vec2::new(1, 0))]
    fn steps(#[case] direction: &str, #[case] expected: Vec2) {
        let direction: Direction = direction.parse().unwrap();
        assert_eq!(Vec2::default().step(direction), Some(expected));
    }

    #[rstest]
    #[case(Vec2::new(i32::MAX, 0), Direction::Right)]
    #[case(Vec2::new(i32::MIN, 0), Direction::Left)]
    #[case(Vec2::new(0, i32::MAX), Direction::Up)]
    #[case(Vec2::new(0, i32::MIN), Direction::Down)]
    fn no_step_past_the_edge(#[case] pos: Vec2, #[case] direction: Direction) {
        assert_eq!(pos.step(direction), None);
    }

    #[test]
    fn step_back_from_the_edge() {
        let edge = Vec2::new(i32::MAX, i32::MIN);
        assert_eq!(
            edge.step(Direction::Left),
            Some(Vec2::new(i32::MAX - 1, i32::MIN))
        );
        assert_eq!(
            edge.step(Direction::Up),
            Some(Vec2::new(i32::MAX, i32::MIN + 1))
        );
    }

    #[test]
    fn unknown_direction() {
        let err = "up".parse::<Direction>().unwrap_err();
        assert!(matches!(err, ConversionError::InvalidValue { got, .. } if got == "up"));
    }
}
