//! ECS systems driving shake engines and stress sources stored in a `hecs::World`.
//!
//! A shakeable entity carries `ShakeEngine` + `Transform` (its local shake pose)
//! and a `Pivot` giving the world position stress distance is measured from.
//! The `Transform` is overwritten every tick, so it is never used for distance.
//! A source entity carries a `StressSource`, optionally tagged with `ExplosionFx`.
//!
//! Per frame, run `update_stress_sources` before `tick_shakeables` so stress
//! delivered this frame is visible in this frame's pose.

use engine_core::{Time, Transform};
use glam::Vec3;
use hecs::{Entity, World};

use crate::engine::ShakeEngine;
use crate::error::ShakeError;
use crate::stress::{Detonation, StressSource};

/// World position of a shakeable's rest point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pivot {
    pub position: Vec3,
}

/// Tag: the host should play its explosion visual when this source fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplosionFx;

/// Report for one source that fired this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detonated {
    pub source: Entity,
    pub target: Entity,
    pub position: Vec3,
    pub stress: f32,
    /// Source carried `ExplosionFx`.
    pub fx: bool,
}

/// Render and decay every shakeable. Returns the number of engines ticked.
pub fn tick_shakeables(world: &mut World, time: &Time) -> usize {
    let mut ticked = 0;
    for (_, (engine, transform)) in world.query_mut::<(&mut ShakeEngine, &mut Transform)>() {
        engine.tick(time, transform);
        ticked += 1;
    }
    ticked
}

/// Advance every stress source by `dt` and deliver the ones that fire.
///
/// A detonation whose target no longer exists, or lacks a `ShakeEngine` or
/// `Pivot`, is a setup error. Every other detonation fired this pass is still
/// delivered, then the first error is returned.
pub fn update_stress_sources(world: &mut World, dt: f32) -> Result<Vec<Detonated>, ShakeError> {
    let fired: Vec<_> = world
        .query_mut::<(&mut StressSource, Option<&ExplosionFx>)>()
        .into_iter()
        .filter_map(|(entity, (source, fx))| {
            source.advance(dt).map(|detonation| (entity, fx.is_some(), detonation))
        })
        .collect();

    let mut reports = Vec::with_capacity(fired.len());
    let mut first_error = None;
    for (source, fx, detonation) in fired {
        match deliver(world, detonation) {
            Ok((target, position, stress)) => {
                if fx {
                    log::debug!("Explosion fx requested at {:?}", position);
                }
                reports.push(Detonated {
                    source,
                    target,
                    position,
                    stress,
                    fx,
                });
            }
            Err(err) => {
                log::error!("Stress source {:?} failed to deliver: {}", source, err);
                first_error.get_or_insert(err);
            }
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(reports),
    }
}

fn deliver(world: &World, detonation: Detonation) -> Result<(Entity, Vec3, f32), ShakeError> {
    let target = detonation.target;
    let target_position = pivot_position(world, target)?;
    let mut engine = world
        .get::<&mut ShakeEngine>(target)
        .map_err(|_| ShakeError::TargetNotFound(target))?;
    let position = detonation.source_position;
    let stress = detonation.apply(&mut *engine, target_position);
    Ok((target, position, stress))
}

/// Strip `StressSource` from entities whose source has fired or been cancelled.
pub fn clear_spent_sources(world: &mut World) -> usize {
    let spent: Vec<Entity> = world
        .query::<&StressSource>()
        .iter()
        .filter(|(_, source)| source.is_spent())
        .map(|(entity, _)| entity)
        .collect();
    for &entity in &spent {
        world.remove_one::<StressSource>(entity).ok();
    }
    spent.len()
}

/// World position distance to a shakeable is measured from.
fn pivot_position(world: &World, target: Entity) -> Result<Vec3, ShakeError> {
    if !world.contains(target) {
        return Err(ShakeError::TargetNotFound(target));
    }
    world
        .get::<&Pivot>(target)
        .map(|pivot| pivot.position)
        .map_err(|_| ShakeError::MissingPivot(target))
}
