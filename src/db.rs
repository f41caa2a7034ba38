// 🗄️ NEO Database - Linking and queries
//
// Owns both collections as arenas and joins them on designation:
// - designation -> NeoId (exact)
// - lowercased name -> NeoIds (confirmed against the exact name on lookup)
//
// Built once, read-only afterwards.

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;

use crate::entities::{ApproachId, CloseApproach, NearEarthObject, NeoId};
use crate::filters::ApproachFilter;

// ============================================================================
// LINK POLICY
// ============================================================================

/// What to do with a close approach whose designation matches no NEO
///
/// The NEO catalog and the approach log are published independently, so
/// unmatched approaches are expected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnlinkedPolicy {
    /// Keep the approach with no NEO reference
    #[default]
    Keep,
    /// Discard the approach during the build
    Drop,
}

// ============================================================================
// LINKED VIEW
// ============================================================================

/// A close approach together with its NEO, as yielded by queries
///
/// Derefs to the underlying `CloseApproach`.
#[derive(Debug, Clone, Copy)]
pub struct LinkedApproach<'db> {
    pub id: ApproachId,
    pub approach: &'db CloseApproach,
    pub neo: Option<&'db NearEarthObject>,
}

impl<'db> Deref for LinkedApproach<'db> {
    type Target = CloseApproach;

    fn deref(&self) -> &CloseApproach {
        self.approach
    }
}

impl fmt::Display for LinkedApproach<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.neo {
            Some(neo) => self.approach.describe(f, &neo.fullname()),
            None => self.approach.describe(f, self.approach.designation()),
        }
    }
}

// ============================================================================
// DATABASE
// ============================================================================

/// Build statistics, logged once per build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub neos: usize,
    pub duplicate_designations: usize,
    pub linked: usize,
    pub unlinked_kept: usize,
    pub unlinked_dropped: usize,
}

pub struct NeoDatabase {
    neos: Vec<NearEarthObject>,
    approaches: Vec<CloseApproach>,
    by_designation: HashMap<String, NeoId>,
    by_name: HashMap<String, Vec<NeoId>>,
    stats: LinkStats,
}

impl NeoDatabase {
    /// Build a database, keeping unmatched approaches unlinked
    pub fn new<N, A>(neos: N, approaches: A) -> Self
    where
        N: IntoIterator<Item = NearEarthObject>,
        A: IntoIterator<Item = CloseApproach>,
    {
        Self::with_policy(neos, approaches, UnlinkedPolicy::Keep)
    }

    /// Build a database with an explicit policy for unmatched approaches
    ///
    /// A later NEO with an already-seen designation replaces the earlier one.
    /// Approaches keep their load order, both in the database and in each
    /// NEO's `approaches`.
    pub fn with_policy<N, A>(neos: N, approaches: A, policy: UnlinkedPolicy) -> Self
    where
        N: IntoIterator<Item = NearEarthObject>,
        A: IntoIterator<Item = CloseApproach>,
    {
        let mut stats = LinkStats::default();

        // 1. Designation index (NEO arena holds unique designations)
        let mut arena: Vec<NearEarthObject> = Vec::new();
        let mut by_designation: HashMap<String, NeoId> = HashMap::new();

        for neo in neos {
            let neo = neo.unlinked();
            match by_designation.get(neo.designation()) {
                Some(&id) => {
                    tracing::warn!(
                        designation = neo.designation(),
                        "duplicate NEO designation, keeping the later record"
                    );
                    stats.duplicate_designations += 1;
                    arena[id.0] = neo;
                }
                None => {
                    let id = NeoId(arena.len());
                    by_designation.insert(neo.designation().to_string(), id);
                    arena.push(neo);
                }
            }
        }
        stats.neos = arena.len();

        // 2. Name index (named NEOs only)
        let mut by_name: HashMap<String, Vec<NeoId>> = HashMap::new();
        for (index, neo) in arena.iter().enumerate() {
            if let Some(name) = neo.name() {
                by_name
                    .entry(name.to_lowercase())
                    .or_default()
                    .push(NeoId(index));
            }
        }

        // 3. Link approaches in load order
        let mut linked: Vec<CloseApproach> = Vec::new();
        for approach in approaches {
            let mut approach = approach.unlinked();
            match by_designation.get(approach.designation()) {
                Some(&neo_id) => {
                    let approach_id = ApproachId(linked.len());
                    approach.link(neo_id);
                    arena[neo_id.0].push_approach(approach_id);
                    linked.push(approach);
                    stats.linked += 1;
                }
                None => match policy {
                    UnlinkedPolicy::Keep => {
                        tracing::debug!(
                            designation = approach.designation(),
                            "close approach has no matching NEO"
                        );
                        linked.push(approach);
                        stats.unlinked_kept += 1;
                    }
                    UnlinkedPolicy::Drop => {
                        tracing::debug!(
                            designation = approach.designation(),
                            "dropping close approach with no matching NEO"
                        );
                        stats.unlinked_dropped += 1;
                    }
                },
            }
        }

        tracing::info!(
            neos = stats.neos,
            linked = stats.linked,
            unlinked_kept = stats.unlinked_kept,
            unlinked_dropped = stats.unlinked_dropped,
            "NEO database built"
        );

        NeoDatabase {
            neos: arena,
            approaches: linked,
            by_designation,
            by_name,
            stats,
        }
    }

    // ========================================================================
    // LOOKUPS
    // ========================================================================

    /// Exact designation lookup; `None` when no NEO has it
    pub fn get_neo_by_designation(&self, designation: &str) -> Option<&NearEarthObject> {
        self.by_designation
            .get(designation)
            .map(|id| &self.neos[id.0])
    }

    /// Exact (case-sensitive) name lookup; unnamed NEOs never match
    pub fn get_neo_by_name(&self, name: &str) -> Option<&NearEarthObject> {
        self.by_name
            .get(&name.to_lowercase())?
            .iter()
            .map(|id| &self.neos[id.0])
            .find(|neo| neo.name() == Some(name))
    }

    pub fn neo(&self, id: NeoId) -> Option<&NearEarthObject> {
        self.neos.get(id.0)
    }

    pub fn approach(&self, id: ApproachId) -> Option<&CloseApproach> {
        self.approaches.get(id.0)
    }

    /// The NEO an approach is linked to, if any
    pub fn neo_of(&self, approach: &CloseApproach) -> Option<&NearEarthObject> {
        approach.neo().and_then(|id| self.neo(id))
    }

    /// Close approaches of a NEO, in load order
    pub fn approaches_of<'a>(
        &'a self,
        neo: &'a NearEarthObject,
    ) -> impl Iterator<Item = &'a CloseApproach> + 'a {
        neo.approaches().iter().filter_map(move |id| self.approach(*id))
    }

    pub fn neos(&self) -> &[NearEarthObject] {
        &self.neos
    }

    pub fn approaches(&self) -> &[CloseApproach] {
        &self.approaches
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    /// One approach paired with its NEO
    pub fn linked(&self, id: ApproachId) -> Option<LinkedApproach<'_>> {
        let approach = self.approach(id)?;
        Some(LinkedApproach {
            id,
            approach,
            neo: self.neo_of(approach),
        })
    }

    /// Every approach paired with its NEO, in load order
    pub fn linked_approaches(&self) -> impl Iterator<Item = LinkedApproach<'_>> + '_ {
        (0..self.approaches.len()).filter_map(move |index| self.linked(ApproachId(index)))
    }

    // ========================================================================
    // QUERY
    // ========================================================================

    /// Lazily yield the approaches that pass every filter, in load order
    ///
    /// Filters are ANDed and evaluated in order; the first failing filter
    /// ends evaluation for that record. An empty filter list yields every
    /// approach. Each call starts a new traversal.
    pub fn query<'a, F>(&'a self, filters: &'a [F]) -> impl Iterator<Item = LinkedApproach<'a>> + 'a
    where
        F: ApproachFilter,
    {
        self.linked_approaches()
            .filter(move |approach| filters.iter().all(|filter| filter.matches(approach)))
    }
}

impl fmt::Debug for NeoDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeoDatabase")
            .field("neos", &self.neos.len())
            .field("approaches", &self.approaches.len())
            .field("stats", &self.stats)
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
