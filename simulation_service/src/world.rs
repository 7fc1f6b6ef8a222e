//! Grid world holding agents and food.
//!
//! The world never talks to spectators itself. Every cell change is queued
//! as a [`CellChange`] and the owner drains the queue with
//! [`World::take_cell_changes`] after each mutation.

use std::collections::{BTreeMap, HashMap};

use olamai_proto::v1;
use rand::Rng;
use thiserror::Error;

use crate::vec2::Vec2;

pub const INITIAL_ENERGY: i32 = 100;
pub const INITIAL_HEALTH: i32 = 100;
pub const LIVING_ENERGY_COST: i32 = 2;
pub const MOVE_ENERGY_COST: i32 = 4;
pub const CONSUME_ENERGY_GAIN: i32 = 10;
pub const NO_ENERGY_HEALTH_COST: i32 = 10;

/// Food spawns with x and y in `-FOOD_SPAWN_RADIUS..FOOD_SPAWN_RADIUS`.
pub const FOOD_SPAWN_RADIUS: i32 = 25;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("cell {0} is already occupied")]
    CellOccupied(Vec2),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityClass {
    Agent,
    Food,
}

impl EntityClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityClass::Agent => "AGENT",
            EntityClass::Food => "FOOD",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: i64,
    pub class: EntityClass,
    pub pos: Vec2,
    pub energy: i32,
    pub health: i32,
    pub model_name: String,
}

impl From<&Entity> for v1::Entity {
    fn from(entity: &Entity) -> Self {
        v1::Entity {
            id: entity.id,
            class: entity.class.as_str().to_string(),
        }
    }
}

impl From<&Entity> for v1::Agent {
    fn from(entity: &Entity) -> Self {
        v1::Agent {
            id: entity.id,
            x: entity.pos.x,
            y: entity.pos.y,
            energy: entity.energy,
            health: entity.health,
            model_name: entity.model_name.clone(),
        }
    }
}

/// A cell whose occupant changed. `entity` is `None` when the cell was emptied.
#[derive(Debug, Clone, PartialEq)]
pub struct CellChange {
    pub pos: Vec2,
    pub entity: Option<v1::Entity>,
}

impl From<CellChange> for v1::CellUpdate {
    fn from(change: CellChange) -> Self {
        v1::CellUpdate {
            x: change.pos.x,
            y: change.pos.y,
            entity: change.entity,
        }
    }
}

#[derive(Debug, Default)]
pub struct World {
    // ids start at 1
    last_entity_id: i64,
    food_count: usize,
    // ordered so agents pay their living cost in id order
    entities: BTreeMap<i64, Entity>,
    cells: HashMap<Vec2, i64>,
    pending: Vec<CellChange>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, pos: Vec2, entity: Option<&Entity>) {
        self.pending.push(CellChange {
            pos,
            entity: entity.map(v1::Entity::from),
        });
    }

    /// Drain every cell change recorded since the last call.
    pub fn take_cell_changes(&mut self) -> Vec<CellChange> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_cell_occupied(&self, pos: Vec2) -> bool {
        self.cells.contains_key(&pos)
    }

    fn new_entity(
        &mut self,
        class: EntityClass,
        model_name: String,
        pos: Vec2,
    ) -> Result<i64, WorldError> {
        if self.is_cell_occupied(pos) {
            return Err(WorldError::CellOccupied(pos));
        }
        self.last_entity_id += 1;
        let id = self.last_entity_id;
        let entity = Entity {
            id,
            class,
            pos,
            energy: INITIAL_ENERGY,
            health: INITIAL_HEALTH,
            model_name,
        };
        if class == EntityClass::Food {
            self.food_count += 1;
        }
        self.record(pos, Some(&entity));
        self.cells.insert(pos, id);
        self.entities.insert(id, entity);
        Ok(id)
    }

    pub fn new_agent(&mut self, model_name: impl Into<String>, pos: Vec2) -> Result<i64, WorldError> {
        self.new_entity(EntityClass::Agent, model_name.into(), pos)
    }

    pub fn new_food(&mut self, pos: Vec2) -> Result<i64, WorldError> {
        self.new_entity(EntityClass::Food, String::new(), pos)
    }

    pub fn get(&self, id: i64) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: i64) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn get_agent(&self, id: i64) -> Option<&Entity> {
        self.get(id).filter(|e| e.class == EntityClass::Agent)
    }

    pub fn entity_at(&self, pos: Vec2) -> Option<&Entity> {
        self.cells.get(&pos).and_then(|id| self.entities.get(id))
    }

    pub fn contains(&self, id: i64) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn food_count(&self) -> usize {
        self.food_count
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Ids of every agent, ascending.
    pub fn agent_ids(&self) -> Vec<i64> {
        self.entities
            .values()
            .filter(|e| e.class == EntityClass::Agent)
            .map(|e| e.id)
            .collect()
    }

    pub fn delete_entity(&mut self, id: i64) -> bool {
        let Some(entity) = self.entities.remove(&id) else {
            return false;
        };
        if entity.class == EntityClass::Food {
            self.food_count -= 1;
        }
        self.cells.remove(&entity.pos);
        self.record(entity.pos, None);
        true
    }

    /// Move an entity to an empty cell. Costs [`MOVE_ENERGY_COST`].
    pub fn entity_move(&mut self, id: i64, target: Vec2) -> bool {
        if self.is_cell_occupied(target) {
            return false;
        }
        let Some(entity) = self.entities.get_mut(&id) else {
            return false;
        };
        let from = entity.pos;
        entity.pos = target;
        entity.energy = (entity.energy - MOVE_ENERGY_COST).max(0);
        let moved = entity.clone();

        self.cells.remove(&from);
        self.cells.insert(target, id);
        self.record(from, None);
        self.record(target, Some(&moved));
        true
    }

    /// Eat the food at `target`. Anything else there (or nothing) fails.
    pub fn entity_consume(&mut self, id: i64, target: Vec2) -> bool {
        if !self.contains(id) {
            return false;
        }
        let food_id = match self.entity_at(target) {
            Some(e) if e.class == EntityClass::Food => e.id,
            _ => return false,
        };
        self.delete_entity(food_id);
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.energy = entity.energy.saturating_add(CONSUME_ENERGY_GAIN);
        }
        true
    }

    /// Charge one tick of living. Returns whether the entity is still alive;
    /// a dead entity is removed from the world.
    pub fn living_cost(&mut self, id: i64) -> bool {
        let Some(entity) = self.entities.get_mut(&id) else {
            return false;
        };
        if entity.energy == 0 {
            entity.health -= NO_ENERGY_HEALTH_COST;
        }
        if entity.health <= 0 {
            self.delete_entity(id);
            return false;
        }
        entity.energy = (entity.energy - LIVING_ENERGY_COST).max(0);
        true
    }

    /// The eight cells around `pos`: top row (y+1) first, left to right.
    /// Cells past the edge of the grid read as empty.
    pub fn observation_cells(&self, pos: Vec2) -> Vec<String> {
        let mut cells = Vec::with_capacity(8);
        for dy in [1, 0, -1] {
            for dx in [-1, 0, 1] {
                if (dx, dy) == (0, 0) {
                    continue;
                }
                let value = pos
                    .offset((dx, dy))
                    .and_then(|cell| self.entity_at(cell))
                    .map(|e| e.class.as_str())
                    .unwrap_or("EMPTY");
                cells.push(value.to_string());
            }
        }
        cells
    }

    /// Every occupied cell of `region`, ordered by x then y.
    pub fn occupied_cells_in_region(&self, region: Vec2, region_size: i32) -> Vec<CellChange> {
        let mut cells: Vec<CellChange> = self
            .entities
            .values()
            .filter(|e| e.pos.region(region_size) == region)
            .map(|e| CellChange {
                pos: e.pos,
                entity: Some(e.into()),
            })
            .collect();
        cells.sort_by_key(|c| c.pos);
        cells
    }

    /// Try `count` random cells and drop food on the empty ones.
    /// The origin is kept clear. Returns how many were spawned.
    pub fn spawn_food<R: Rng>(&mut self, count: usize, rng: &mut R) -> usize {
        let mut spawned = 0;
        for _ in 0..count {
            let pos = Vec2::new(
                rng.gen_range(-FOOD_SPAWN_RADIUS..FOOD_SPAWN_RADIUS),
                rng.gen_range(-FOOD_SPAWN_RADIUS..FOOD_SPAWN_RADIUS),
            );
            if pos == Vec2::default() {
                continue;
            }
            if self.new_food(pos).is_ok() {
                spawned += 1;
            }
        }
        spawned
    }

    /// Remove every entity. Ids keep counting up.
    pub fn reset(&mut self) {
        let ids: Vec<i64> = self.entities.keys().copied().collect();
        for id in ids {
            self.delete_entity(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use rstest::rstest;

    fn origin() -> Vec2 {
        Vec2::new(0, 0)
    }

    #[test]
    fn new_food_entity() {
        let mut w = World::new();
        let id = w.new_food(origin()).unwrap();
        let food = w.get(id).unwrap();
        assert_eq!(food.class, EntityClass::Food);
        assert_eq!(food.pos, origin());
        assert_eq!(w.food_count(), 1);
        assert_eq!(w.take_cell_changes().len(), 1);
    }

    #[test]
    fn new_agent_entity() {
        let mut w = World::new();
        let id = w.new_agent("model", origin()).unwrap();
        let agent = w.get_agent(id).unwrap();
        assert_eq!(agent.class, EntityClass::Agent);
        assert_eq!(agent.energy, INITIAL_ENERGY);
        assert_eq!(agent.health, INITIAL_HEALTH);
        assert_eq!(agent.model_name, "model");
        let changes = w.take_cell_changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].entity.as_ref().unwrap().class, "AGENT");
    }

    #[test]
    fn new_entity_on_occupied_cell() {
        let mut w = World::new();
        w.new_agent("", origin()).unwrap();
        assert_eq!(
            w.new_agent("", origin()),
            Err(WorldError::CellOccupied(origin()))
        );
        assert_eq!(w.new_food(origin()), Err(WorldError::CellOccupied(origin())));
        assert_eq!(w.food_count(), 0);
        assert_eq!(w.take_cell_changes().len(), 1);
    }

    #[test]
    fn delete_entity() {
        let mut w = World::new();
        let id = w.new_agent("", origin()).unwrap();
        assert!(w.delete_entity(id));
        assert!(!w.delete_entity(id));
        assert!(w.entity_at(origin()).is_none());
        let changes = w.take_cell_changes();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[1].entity, None);
    }

    #[test]
    fn entity_move() {
        let mut w = World::new();
        let id = w.new_agent("", origin()).unwrap();
        assert!(w.entity_move(id, Vec2::new(0, 1)));
        let agent = w.get(id).unwrap();
        assert_eq!(agent.pos, Vec2::new(0, 1));
        assert_eq!(agent.energy, INITIAL_ENERGY - MOVE_ENERGY_COST);
        assert!(w.entity_at(origin()).is_none());
        let changes = w.take_cell_changes();
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[1].pos, origin());
        assert_eq!(changes[1].entity, None);
        assert_eq!(changes[2].pos, Vec2::new(0, 1));
    }

    #[test]
    fn entity_move_into_occupied_cell() {
        let mut w = World::new();
        let id = w.new_agent("", origin()).unwrap();
        w.new_food(Vec2::new(1, 0)).unwrap();
        assert!(!w.entity_move(id, Vec2::new(1, 0)));
        assert!(!w.entity_move(999, Vec2::new(5, 5)));
        assert_eq!(w.get(id).unwrap().pos, origin());
        assert_eq!(w.take_cell_changes().len(), 2);
    }

    #[test]
    fn entity_consume() {
        let mut w = World::new();
        let id = w.new_agent("", origin()).unwrap();
        w.get_mut(id).unwrap().energy = 80;
        w.new_food(Vec2::new(1, 0)).unwrap();
        assert!(w.entity_consume(id, Vec2::new(1, 0)));
        assert_eq!(w.get(id).unwrap().energy, 90);
        assert_eq!(w.food_count(), 0);
        assert_eq!(w.take_cell_changes().len(), 3);
    }

    #[test]
    fn cannot_consume_agents_or_empty_cells() {
        let mut w = World::new();
        let id = w.new_agent("", origin()).unwrap();
        let other = w.new_agent("", Vec2::new(1, 0)).unwrap();
        assert!(!w.entity_consume(id, Vec2::new(1, 0)));
        assert!(!w.entity_consume(id, Vec2::new(0, 1)));
        assert!(w.contains(other));
    }

    #[test]
    fn living_cost() {
        let mut w = World::new();
        let id = w.new_agent("", origin()).unwrap();
        assert!(w.living_cost(id));
        assert_eq!(w.get(id).unwrap().energy, 98);

        w.get_mut(id).unwrap().energy = 0;
        assert!(w.living_cost(id));
        let agent = w.get(id).unwrap();
        assert_eq!(agent.health, 90);
        assert_eq!(agent.energy, 0);
    }

    #[test]
    fn living_cost_kills_at_zero_health() {
        let mut w = World::new();
        let id = w.new_agent("", origin()).unwrap();
        {
            let agent = w.get_mut(id).unwrap();
            agent.energy = 0;
            agent.health = 10;
        }
        assert!(!w.living_cost(id));
        assert!(!w.contains(id));
        assert!(!w.living_cost(id));
    }

    #[test]
    fn observation_cells_order() {
        let mut w = World::new();
        w.new_food(Vec2::new(-1, 1)).unwrap();
        w.new_agent("", Vec2::new(1, -1)).unwrap();
        w.new_food(Vec2::new(1, 0)).unwrap();
        let cells = w.observation_cells(origin());
        assert_eq!(
            cells,
            vec!["FOOD", "EMPTY", "EMPTY", "EMPTY", "FOOD", "EMPTY", "EMPTY", "AGENT"]
        );
    }

    #[rstest]
    #[case(Vec2::new(i32::MAX, i32::MAX))]
    #[case(Vec2::new(i32::MIN, i32::MIN))]
    #[case(Vec2::new(i32::MAX, i32::MIN))]
    fn observation_at_the_edge_of_the_grid(#[case] pos: Vec2) {
        let mut w = World::new();
        let id = w.new_agent("", pos).unwrap();
        let inner = Vec2::new(
            if pos.x > 0 { pos.x - 1 } else { pos.x + 1 },
            pos.y,
        );
        w.new_food(inner).unwrap();
        let cells = w.observation_cells(w.get(id).unwrap().pos);
        assert_eq!(cells.len(), 8);
        assert_eq!(cells.iter().filter(|c| *c == "FOOD").count(), 1);
    }

    #[test]
    fn consume_energy_saturates() {
        let mut w = World::new();
        let id = w.new_agent("", origin()).unwrap();
        w.get_mut(id).unwrap().energy = i32::MAX - 1;
        w.new_food(Vec2::new(0, 1)).unwrap();
        assert!(w.entity_consume(id, Vec2::new(0, 1)));
        assert_eq!(w.get(id).unwrap().energy, i32::MAX);
    }

    #[test]
    fn occupied_cells_of_a_region() {
        let mut w = World::new();
        let agent = w.new_agent("", Vec2::new(3, 1)).unwrap();
        w.new_food(Vec2::new(0, 2)).unwrap();
        w.new_food(Vec2::new(3, 0)).unwrap();
        w.new_food(Vec2::new(4, 0)).unwrap();
        w.new_food(Vec2::new(-1, 0)).unwrap();

        let cells = w.occupied_cells_in_region(Vec2::new(0, 0), 4);
        let positions: Vec<Vec2> = cells.iter().map(|c| c.pos).collect();
        assert_eq!(
            positions,
            vec![Vec2::new(0, 2), Vec2::new(3, 0), Vec2::new(3, 1)]
        );
        assert_eq!(cells[2].entity.as_ref().unwrap().id, agent);
        assert!(w.occupied_cells_in_region(Vec2::new(i32::MAX, 0), 4).is_empty());
    }

    #[test]
    fn spawn_food_avoids_origin_and_occupied_cells() {
        let mut w = World::new();
        w.new_agent("", Vec2::new(3, 3)).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let spawned = w.spawn_food(500, &mut rng);
        assert!(spawned > 0);
        assert_eq!(w.food_count(), spawned);
        assert!(w.entity_at(origin()).is_none());
        assert_eq!(w.get_agent(1).unwrap().pos, Vec2::new(3, 3));
        for change in w.take_cell_changes().iter().skip(1) {
            assert!((-25..25).contains(&change.pos.x));
            assert!((-25..25).contains(&change.pos.y));
        }
    }

    #[test]
    fn reset_keeps_ids_monotonic() {
        let mut w = World::new();
        let first = w.new_agent("", origin()).unwrap();
        w.new_food(Vec2::new(2, 2)).unwrap();
        w.take_cell_changes();
        w.reset();
        assert!(w.is_empty());
        assert_eq!(w.food_count(), 0);
        assert_eq!(w.take_cell_changes().len(), 2);
        let next = w.new_agent("", origin()).unwrap();
        assert!(next > first + 1);
    }

    #[test]
    fn agent_ids_are_ascending_and_skip_food() {
        let mut w = World::new();
        let a = w.new_agent("", Vec2::new(5, 5)).unwrap();
        w.new_food(Vec2::new(1, 1)).unwrap();
        let b = w.new_agent("", Vec2::new(-5, 5)).unwrap();
        assert_eq!(w.agent_ids(), vec![a, b]);
    }
}
