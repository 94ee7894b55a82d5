use serde::{Deserialize, Serialize};

/// Obstacle classes the response grid distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Impassable; can never be explored or hold a victim.
    Mountain,
    /// Passable but costly to search once; `explored` flips after the
    /// first sweep and the cell has nothing left to find.
    CollapsedBuilding { explored: bool },
}

/// Mutually exclusive terrain tag for one grid cell.
///
/// At most one of `VictimPresent`, `SafeZone` and
/// `Obstacle(Mountain)` ever holds for a cell; a rescue converts
/// `VictimPresent` directly into `SafeZone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TerrainClass {
    #[default]
    Empty,
    Obstacle(ObstacleKind),
    VictimPresent,
    SafeZone,
}

impl TerrainClass {
    #[must_use]
    pub fn is_mountain(&self) -> bool {
        matches!(self, TerrainClass::Obstacle(ObstacleKind::Mountain))
    }

    #[must_use]
    pub fn is_obstacle(&self) -> bool {
        matches!(self, TerrainClass::Obstacle(_))
    }

    /// Map-legend symbol used by diagnostic output.
    #[must_use]
    pub fn symbol(&self) -> char {
        match self {
            TerrainClass::Empty => ' ',
            TerrainClass::Obstacle(ObstacleKind::Mountain) => '▲',
            TerrainClass::Obstacle(ObstacleKind::CollapsedBuilding { .. }) => '▒',
            TerrainClass::VictimPresent => '!',
            TerrainClass::SafeZone => '+',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mountain_predicate() {
        assert!(TerrainClass::Obstacle(ObstacleKind::Mountain).is_mountain());
        assert!(!TerrainClass::Obstacle(ObstacleKind::CollapsedBuilding { explored: false })
            .is_mountain());
        assert!(!TerrainClass::VictimPresent.is_mountain());
    }

    #[test]
    fn test_default_is_empty() {
        assert_eq!(TerrainClass::default(), TerrainClass::Empty);
    }
}
