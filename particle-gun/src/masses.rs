use particle_gun_common::{Mass, Pid};
use std::collections::HashMap;

/// PDG rest masses in GeV, keyed by particle id.
const PDG_MASSES: [(Pid, Mass); 15] = [
    (211, 0.139570),  // pi+
    (-211, 0.139570), // pi-
    (2212, 0.93827),  // p
    (-2212, 0.93827), // pbar
    (2112, 0.93957),  // n
    (111, 0.13498),   // pi0
    (130, 0.49767),   // K_L
    (310, 0.49767),   // K_S
    (11, 0.00051),
    (-11, 0.00051),
    (22, 0.0),
    (13, 0.10566),
    (-13, 0.10566),
    (213, 0.76690),  // rho(770)+
    (-213, 0.76690), // rho(770)-
];

/// Immutable lookup from particle id to rest mass.
///
/// Species absent from the table are treated as massless.
#[derive(Clone, Debug)]
pub(crate) struct MassTable {
    masses: HashMap<Pid, Mass>,
}

impl MassTable {
    pub(crate) fn pdg() -> Self {
        Self {
            masses: PDG_MASSES.into_iter().collect(),
        }
    }

    pub(crate) fn mass(&self, pid: Pid) -> Mass {
        self.masses.get(&pid).copied().unwrap_or_default()
    }

    pub(crate) fn contains(&self, pid: Pid) -> bool {
        self.masses.contains_key(&pid)
    }
}

impl Default for MassTable {
    fn default() -> Self {
        Self::pdg()
    }
}
