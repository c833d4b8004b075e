// src/core/defeso/catalog.rs
use super::types::{DefesoDefinition, MonthDay};

pub const DEFAULT_KEY: &str = "default";

/// Region key → closed-season rule, with a fallback for unknown keys.
#[derive(Debug, Clone)]
pub struct DefesoCatalog {
    regions: Vec<(String, DefesoDefinition)>,
    fallback: DefesoDefinition,
}

impl DefesoCatalog {
    pub fn new(fallback: DefesoDefinition) -> Self {
        Self {
            regions: Vec::new(),
            fallback,
        }
    }

    /// The official per-basin table.
    pub fn builtin() -> Self {
        let mut catalog = Self::new(definition(
            "Espécies Nativas",
            "Período de defeso geral para reprodução.",
            (11, 1),
            (2, 28),
        ));

        catalog.insert(
            "Norte - Bacia Amazônica",
            definition(
                "Tambaqui / Pirarucu",
                "Período de reprodução. Proibida a pesca de espécies nativas.",
                (11, 15),
                (3, 15),
            ),
        );
        catalog.insert(
            "Nordeste - Bacia do Parnaíba",
            definition(
                "Lagosta / Camarão",
                "Defeso para preservação dos estoques pesqueiros.",
                (2, 1),
                (4, 30),
            ),
        );
        catalog.insert(
            "Centro-Oeste - Bacia do Paraguai",
            definition(
                "Piracema (Geral)",
                "Proteção à reprodução natural dos peixes.",
                (11, 5),
                (2, 28),
            ),
        );
        catalog.insert(
            "Sudeste - Bacia do Paraná",
            definition(
                "Piracema",
                "Período de defeso para proteção da ictiofauna.",
                (11, 1),
                (2, 28),
            ),
        );

        catalog
    }

    /// Adds or replaces a region.
    pub fn insert(&mut self, key: impl Into<String>, def: DefesoDefinition) {
        let key = key.into();
        match self.regions.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = def,
            None => self.regions.push((key, def)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&DefesoDefinition> {
        self.regions.iter().find(|(k, _)| k == key).map(|(_, d)| d)
    }

    /// Exact-match lookup falling back to the default rule.
    pub fn lookup(&self, key: &str) -> &DefesoDefinition {
        self.get(key).unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &DefesoDefinition {
        &self.fallback
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|(k, _)| k.as_str())
    }

    pub fn definitions(&self) -> impl Iterator<Item = (&str, &DefesoDefinition)> {
        self.regions.iter().map(|(k, d)| (k.as_str(), d))
    }
}

impl Default for DefesoCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn definition(species: &str, description: &str, start: (u32, u32), end: (u32, u32)) -> DefesoDefinition {
    DefesoDefinition {
        species: species.to_string(),
        description: description.to_string(),
        start: MonthDay::from_table(start.0, start.1),
        end: MonthDay::from_table(end.0, end.1),
    }
}
