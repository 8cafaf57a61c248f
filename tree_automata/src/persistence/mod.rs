//! Save and load of which node each system is in.
//!
//! Saved references are persistent ids (name paths from a system root),
//! never process-local ids, so a save taken in one run can be loaded into
//! a fresh controller built the same way in another.
//!
//! Loading resolves each saved system in three steps:
//! 1. the persistent id, walked from the system's current root;
//! 2. the node name alone, anywhere in that hierarchy (unless disabled);
//! 3. the system root, logged as a degradation.
//!
//! Systems the controller does not know are skipped. Malformed input
//! fails the whole load before any state changes.

mod snapshot;

pub use snapshot::*;

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::automaton::{NodeId, PersistentId};
use crate::controller::Controller;
use crate::error::PersistenceError;

/// How a saved system's node was found on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    PersistentId,
    Name,
    /// Nothing matched; the system was put back at its root.
    RootFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredSystem {
    pub system: String,
    pub node: NodeId,
    pub resolution: Resolution,
}

/// What a load did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub snapshot_id: Uuid,
    pub restored: Vec<RestoredSystem>,
    /// Saved systems this controller does not have.
    pub skipped: Vec<String>,
}

impl LoadReport {
    pub fn resolution(&self, system: &str) -> Option<Resolution> {
        self.restored
            .iter()
            .find(|restored| restored.system == system)
            .map(|restored| restored.resolution)
    }

    /// Whether any system was skipped or not restored by persistent id.
    pub fn is_degraded(&self) -> bool {
        !self.skipped.is_empty()
            || self
                .restored
                .iter()
                .any(|restored| restored.resolution != Resolution::PersistentId)
    }
}

impl Controller {
    /// Capture every system's current node and the context tail.
    pub fn snapshot(&self) -> SaveData {
        let systems = self
            .system_roots
            .keys()
            .map(|system| SystemSnapshot {
                name: system.clone(),
                current: self.current_node(system).and_then(|current| {
                    let node = self.node(current)?;
                    let persistent_id = self
                        .path_to(system, current)
                        .unwrap_or_else(|| PersistentId::root(system, node.name()));

                    Some(CurrentNodeSnapshot {
                        persistent_id: persistent_id.to_string(),
                        node_name: node.name().to_string(),
                        state_data: node.core().state_data.clone(),
                    })
                }),
            })
            .collect();

        SaveData {
            snapshot_id: Uuid::new_v4(),
            systems,
            context: ContextSnapshot {
                days_passed: self.context.world.days_passed,
                known_facts: self.context.player.known_facts.iter().cloned().collect(),
            },
        }
    }

    /// Write a snapshot to `writer`.
    pub fn save<W: Write>(&self, writer: W, format: SaveFormat) -> Result<(), PersistenceError> {
        let data = self.snapshot();
        format.encode(&data, writer)?;
        info!(
            snapshot = %data.snapshot_id,
            systems = data.systems.len(),
            "saved controller state"
        );
        Ok(())
    }

    /// Write a snapshot to a file. Nothing is written if encoding fails.
    pub fn save_to_path(
        &self,
        path: impl AsRef<Path>,
        format: SaveFormat,
    ) -> Result<(), PersistenceError> {
        let mut bytes = Vec::new();
        self.save(&mut bytes, format)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Read a snapshot from `reader` and apply it.
    pub fn load<R: Read>(
        &mut self,
        reader: R,
        format: SaveFormat,
    ) -> Result<LoadReport, PersistenceError> {
        let data = format.decode(reader)?;
        Ok(self.restore(data))
    }

    pub fn load_from_path(
        &mut self,
        path: impl AsRef<Path>,
        format: SaveFormat,
    ) -> Result<LoadReport, PersistenceError> {
        let reader = BufReader::new(File::open(path)?);
        self.load(reader, format)
    }

    /// Apply an already decoded snapshot.
    ///
    /// Systems missing from the snapshot are left unstarted. No lifecycle
    /// hooks fire: restoring is not a transition.
    pub fn restore(&mut self, data: SaveData) -> LoadReport {
        let mut report = LoadReport {
            snapshot_id: data.snapshot_id,
            restored: Vec::new(),
            skipped: Vec::new(),
        };

        self.current_nodes.clear();
        self.changed.clear();

        for system in data.systems {
            let Some(root) = self.system_root(&system.name) else {
                warn!(system = %system.name, "system not found during load; skipping");
                report.skipped.push(system.name);
                continue;
            };
            let Some(current) = system.current else {
                continue;
            };

            let (node, resolution) = self.resolve(&system.name, root, &current);

            if resolution != Resolution::RootFallback {
                if let Some(target) = self.node_mut(node) {
                    target.core_mut().state_data = current.state_data;
                }
            }

            self.current_nodes.insert(system.name.clone(), node);
            self.changed.insert(system.name.clone(), true);
            report.restored.push(RestoredSystem {
                system: system.name,
                node,
                resolution,
            });
        }

        self.context.world.set_days_passed(data.context.days_passed);
        self.context.player.known_facts = data.context.known_facts.into_iter().collect();

        info!(
            snapshot = %report.snapshot_id,
            restored = report.restored.len(),
            skipped = report.skipped.len(),
            "loaded controller state"
        );
        report
    }

    fn resolve(
        &self,
        system: &str,
        root: NodeId,
        saved: &CurrentNodeSnapshot,
    ) -> (NodeId, Resolution) {
        let persistent_id = PersistentId::from(saved.persistent_id.as_str());
        if let Some(node) = self.find_by_persistent_id(system, &persistent_id) {
            debug!(system, persistent_id = %persistent_id, "restored node by persistent id");
            return (node, Resolution::PersistentId);
        }

        if self.config.name_fallback {
            let name = if saved.node_name.is_empty() {
                persistent_id.node_name()
            } else {
                saved.node_name.clone()
            };
            if let Some(node) = self.find_in_hierarchy_by_name(system, &name) {
                warn!(
                    system,
                    persistent_id = %persistent_id,
                    node = %name,
                    "persistent id not found; matched node by name"
                );
                return (node, Resolution::Name);
            }
        }

        warn!(
            system,
            persistent_id = %persistent_id,
            "node not found during load; falling back to system root"
        );
        (root, Resolution::RootFallback)
    }
}
