//! Seed management for terrain generation
//!
//! Every agent draws from its own generator, seeded from a sub-seed derived
//! from one master seed. Overriding a single sub-seed varies that agent while
//! the rest of the island stays put.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seeds for all terrain agents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AgentSeeds {
    /// Master seed (used for display/reference)
    pub master: u64,
    /// Coastline growth
    pub coast: u64,
    /// Relief noise right after the coast
    pub relief_noise: u64,
    /// Mountain ranges
    pub mountains: u64,
    /// Hill chains
    pub hills: u64,
    /// Beach carving
    pub beaches: u64,
    /// Texture noise after the beaches
    pub finish_noise: u64,
    /// Volcano placement and cone noise
    pub volcanoes: u64,
    /// Lava rivers
    pub lava: u64,
}

impl AgentSeeds {
    /// Create seeds from a master seed, deriving all sub-seeds deterministically.
    pub fn from_master(master: u64) -> Self {
        Self {
            master,
            coast: derive_seed(master, "coast"),
            relief_noise: derive_seed(master, "relief_noise"),
            mountains: derive_seed(master, "mountains"),
            hills: derive_seed(master, "hills"),
            beaches: derive_seed(master, "beaches"),
            finish_noise: derive_seed(master, "finish_noise"),
            volcanoes: derive_seed(master, "volcanoes"),
            lava: derive_seed(master, "lava"),
        }
    }

    /// Create a builder for customizing individual seeds
    pub fn builder(master: u64) -> AgentSeedsBuilder {
        AgentSeedsBuilder::new(master)
    }
}

impl Default for AgentSeeds {
    fn default() -> Self {
        Self::from_master(rand::random())
    }
}

/// A generator for one agent.
pub fn agent_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Builder for customizing individual seeds while deriving others from master
pub struct AgentSeedsBuilder {
    seeds: AgentSeeds,
}

impl AgentSeedsBuilder {
    pub fn new(master: u64) -> Self {
        Self {
            seeds: AgentSeeds::from_master(master),
        }
    }

    pub fn coast(mut self, seed: u64) -> Self {
        self.seeds.coast = seed;
        self
    }

    pub fn relief_noise(mut self, seed: u64) -> Self {
        self.seeds.relief_noise = seed;
        self
    }

    pub fn mountains(mut self, seed: u64) -> Self {
        self.seeds.mountains = seed;
        self
    }

    pub fn hills(mut self, seed: u64) -> Self {
        self.seeds.hills = seed;
        self
    }

    pub fn beaches(mut self, seed: u64) -> Self {
        self.seeds.beaches = seed;
        self
    }

    pub fn finish_noise(mut self, seed: u64) -> Self {
        self.seeds.finish_noise = seed;
        self
    }

    pub fn volcanoes(mut self, seed: u64) -> Self {
        self.seeds.volcanoes = seed;
        self
    }

    pub fn lava(mut self, seed: u64) -> Self {
        self.seeds.lava = seed;
        self
    }

    pub fn build(self) -> AgentSeeds {
        self.seeds
    }
}

/// Derive a sub-seed from a master seed and an agent name.
fn derive_seed(master: u64, agent: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    master.hash(&mut hasher);
    agent.hash(&mut hasher);
    hasher.finish()
}

impl std::fmt::Display for AgentSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "AgentSeeds {{ master: {}, coast: {}, relief_noise: {}, mountains: {}, hills: {}, \
             beaches: {}, finish_noise: {}, volcanoes: {}, lava: {} }}",
            self.master,
            self.coast,
            self.relief_noise,
            self.mountains,
            self.hills,
            self.beaches,
            self.finish_noise,
            self.volcanoes,
            self.lava,
        )
    }
}
