//! Static authorization hierarchy used when the remote policy cannot answer.
//!
//! Everything here is pure and total: any `(role, resource, action)` triple
//! produces a boolean, and anything not explicitly granted is denied. The
//! table is intentionally hardcoded so an outage of the policy service
//! degrades to a conservative known-good matrix, never to blanket access.

use super::resource::{Action, Resource};
use super::role::Role;

/// Decide a permission from the static hierarchy alone.
pub fn fallback_decision(role: Role, resource: Resource, action: Action) -> bool {
    match role {
        Role::Admin => true,
        Role::Manager => !matches!(
            (resource, action),
            (Resource::Users, Action::Delete)
                | (Resource::Archive, Action::Create)
                | (Resource::Archive, Action::Delete)
        ),
        Role::Responsable => match resource {
            // Working set, minus delete everywhere.
            Resource::Dashboard
            | Resource::Vehicles
            | Resource::Installations
            | Resource::Screens
            | Resource::Communications => action != Action::Delete,
            // Visible but read-only.
            Resource::Users | Resource::Archive => action == Action::View,
            _ => false,
        },
        Role::Operario => {
            action == Action::View
                && matches!(
                    resource,
                    Resource::Dashboard
                        | Resource::Vehicles
                        | Resource::Installations
                        | Resource::Screens
                        | Resource::CalendarioGlobal
                )
        }
        Role::Produccion => home_area(Resource::Produccion, resource, action),
        Role::Envios => home_area(Resource::Envios, resource, action),
        Role::Almacen => {
            home_area(Resource::Almacen, resource, action)
                || (resource == Resource::Comercial && action == Action::View)
        }
        Role::Comercial => home_area(Resource::Comercial, resource, action),
        Role::Unknown => false,
    }
}

/// Grant shape shared by the single-area roles: full working actions on the
/// role's own area, read access to the dashboard, nothing else.
fn home_area(home: Resource, resource: Resource, action: Action) -> bool {
    if resource == home {
        action != Action::Delete
    } else {
        resource == Resource::Dashboard && action == Action::View
    }
}

/// Actions the static hierarchy grants `role` on `resource`.
pub fn allowed_actions(role: Role, resource: Resource) -> Vec<Action> {
    Action::ALL
        .into_iter()
        .filter(|&action| fallback_decision(role, resource, action))
        .collect()
}

/// Full static grant listing for a role, skipping resources with no grants.
pub fn grant_map(role: Role) -> Vec<(Resource, Vec<Action>)> {
    Resource::ALL
        .into_iter()
        .filter_map(|resource| {
            let actions = allowed_actions(role, resource);
            (!actions.is_empty()).then_some((resource, actions))
        })
        .collect()
}

/// Role-management precedence: strictly higher rank manages lower, never a
/// peer or itself.
pub fn can_manage(manager: Role, target: Role) -> bool {
    manager.rank() > target.rank()
}
