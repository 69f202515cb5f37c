use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed enumeration of the application areas access checks run against.
///
/// The wire names are the kebab-case section slugs the dashboard routes on.
/// Adding an area means adding a variant here and teaching the static
/// hierarchy about it; there is no catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Dashboard,
    Users,
    Vehicles,
    Installations,
    Templates,
    Screens,
    Communications,
    Archive,
    Admin,
    Comercial,
    CalendarioGlobal,
    Gestion,
    Production,
    Produccion,
    Kiosk,
    Almacen,
    Envios,
    Data,
    Settings,
    Matrix,
    SlaConfig,
    SystemLog,
}

impl Resource {
    pub const ALL: [Resource; 22] = [
        Resource::Dashboard,
        Resource::Users,
        Resource::Vehicles,
        Resource::Installations,
        Resource::Templates,
        Resource::Screens,
        Resource::Communications,
        Resource::Archive,
        Resource::Admin,
        Resource::Comercial,
        Resource::CalendarioGlobal,
        Resource::Gestion,
        Resource::Production,
        Resource::Produccion,
        Resource::Kiosk,
        Resource::Almacen,
        Resource::Envios,
        Resource::Data,
        Resource::Settings,
        Resource::Matrix,
        Resource::SlaConfig,
        Resource::SystemLog,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Dashboard => "dashboard",
            Resource::Users => "users",
            Resource::Vehicles => "vehicles",
            Resource::Installations => "installations",
            Resource::Templates => "templates",
            Resource::Screens => "screens",
            Resource::Communications => "communications",
            Resource::Archive => "archive",
            Resource::Admin => "admin",
            Resource::Comercial => "comercial",
            Resource::CalendarioGlobal => "calendario-global",
            Resource::Gestion => "gestion",
            Resource::Production => "production",
            Resource::Produccion => "produccion",
            Resource::Kiosk => "kiosk",
            Resource::Almacen => "almacen",
            Resource::Envios => "envios",
            Resource::Data => "data",
            Resource::Settings => "settings",
            Resource::Matrix => "matrix",
            Resource::SlaConfig => "sla-config",
            Resource::SystemLog => "system-log",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Resource {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|resource| resource.as_str() == value)
            .ok_or(())
    }
}

/// The four verbs a check can ask about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::View, Action::Create, Action::Edit, Action::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Create => "create",
            Action::Edit => "edit",
            Action::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Action {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == value)
            .ok_or(())
    }
}
