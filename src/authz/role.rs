use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Canonical role vocabulary for the dashboard.
///
/// Role strings arrive from token claims and stored profiles, so they are
/// untrusted input. Anything outside the canonical set collapses to
/// [`Role::Unknown`], which holds no grants and outranks nobody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Responsable,
    Operario,
    Produccion,
    Envios,
    Almacen,
    Comercial,
    Unknown,
}

impl Role {
    /// Every role that can actually be assigned, highest authority first.
    pub const CANONICAL: [Role; 8] = [
        Role::Admin,
        Role::Manager,
        Role::Responsable,
        Role::Operario,
        Role::Produccion,
        Role::Envios,
        Role::Almacen,
        Role::Comercial,
    ];

    /// Canonical roles plus the unknown sink, for exhaustive sweeps.
    pub const ALL: [Role; 9] = [
        Role::Admin,
        Role::Manager,
        Role::Responsable,
        Role::Operario,
        Role::Produccion,
        Role::Envios,
        Role::Almacen,
        Role::Comercial,
        Role::Unknown,
    ];

    /// Collapse an untrusted role string onto the canonical set.
    ///
    /// Matching is case-insensitive. A missing or unrecognized value maps to
    /// [`Role::Unknown`]; callers decide whether that deserves a log line.
    pub fn normalize(input: Option<&str>) -> Role {
        let raw = match input {
            Some(raw) => raw,
            None => return Role::Unknown,
        };

        match raw.to_lowercase().as_str() {
            "admin" => Role::Admin,
            "manager" => Role::Manager,
            "responsable" => Role::Responsable,
            "operario" => Role::Operario,
            "produccion" => Role::Produccion,
            "envios" => Role::Envios,
            "almacen" => Role::Almacen,
            "comercial" => Role::Comercial,
            _ => Role::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Responsable => "responsable",
            Role::Operario => "operario",
            Role::Produccion => "produccion",
            Role::Envios => "envios",
            Role::Almacen => "almacen",
            Role::Comercial => "comercial",
            Role::Unknown => "unknown",
        }
    }

    /// Position in the management hierarchy. Higher manages lower, never equal.
    pub fn rank(self) -> u8 {
        match self {
            Role::Admin => 8,
            Role::Manager => 7,
            Role::Responsable => 6,
            Role::Operario => 5,
            Role::Produccion => 4,
            Role::Envios => 3,
            Role::Almacen => 2,
            Role::Comercial => 1,
            Role::Unknown => 0,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match Role::normalize(Some(value)) {
            Role::Unknown => Err(()),
            role => Ok(role),
        }
    }
}
