//! Exhaustive checks of the static fallback hierarchy.
//!
//! The grant tables here are written out literally, as a second encoding of
//! the matrix, so a slip in the production tables shows up as a diff instead
//! of being mirrored by the test.

use tablero_authz::authz::{can_manage, fallback_decision, grant_map, Action, Resource, Role};

#[test]
fn every_input_combination_yields_a_verdict() {
    // Total over roles x resources x actions; unknown never collects a grant.
    let mut unknown_allows = 0;
    for role in Role::ALL {
        for resource in Resource::ALL {
            for action in Action::ALL {
                let allowed = fallback_decision(role, resource, action);
                if role == Role::Unknown && allowed {
                    unknown_allows += 1;
                }
            }
        }
    }
    assert_eq!(unknown_allows, 0);
}

#[test]
fn admin_is_unrestricted() {
    let grants = grant_map(Role::Admin);
    assert_eq!(grants.len(), Resource::ALL.len());
    for (resource, actions) in grants {
        assert_eq!(actions, Action::ALL, "admin on {}", resource);
    }
}

#[test]
fn manager_covers_everything_except_carveouts() {
    let grants = grant_map(Role::Manager);
    assert_eq!(grants.len(), Resource::ALL.len());
    for (resource, actions) in grants {
        let expected: &[Action] = match resource {
            Resource::Users => &[Action::View, Action::Create, Action::Edit],
            Resource::Archive => &[Action::View, Action::Edit],
            _ => &[Action::View, Action::Create, Action::Edit, Action::Delete],
        };
        assert_eq!(actions, expected, "manager on {}", resource);
    }
}

#[test]
fn responsable_grant_table() {
    let working = vec![Action::View, Action::Create, Action::Edit];
    let expected = [
        (Resource::Dashboard, working.clone()),
        (Resource::Users, vec![Action::View]),
        (Resource::Vehicles, working.clone()),
        (Resource::Installations, working.clone()),
        (Resource::Screens, working.clone()),
        (Resource::Communications, working.clone()),
        (Resource::Archive, vec![Action::View]),
    ];

    assert_eq!(grant_map(Role::Responsable), expected);
}

#[test]
fn operario_grant_table() {
    let expected = [
        (Resource::Dashboard, vec![Action::View]),
        (Resource::Vehicles, vec![Action::View]),
        (Resource::Installations, vec![Action::View]),
        (Resource::Screens, vec![Action::View]),
        (Resource::CalendarioGlobal, vec![Action::View]),
    ];

    assert_eq!(grant_map(Role::Operario), expected);
}

#[test]
fn single_area_grant_tables() {
    let working = vec![Action::View, Action::Create, Action::Edit];

    for (role, home) in [
        (Role::Produccion, Resource::Produccion),
        (Role::Envios, Resource::Envios),
        (Role::Comercial, Resource::Comercial),
    ] {
        let expected = [
            (Resource::Dashboard, vec![Action::View]),
            (home, working.clone()),
        ];
        assert_eq!(grant_map(role), expected, "grants for {}", role);
    }

    // Almacen additionally reads the comercial area.
    let expected = [
        (Resource::Dashboard, vec![Action::View]),
        (Resource::Comercial, vec![Action::View]),
        (Resource::Almacen, working),
    ];
    assert_eq!(grant_map(Role::Almacen), expected);
}

#[test]
fn absence_of_a_grant_is_a_denial() {
    assert!(!fallback_decision(Role::Operario, Resource::Dashboard, Action::Create));
    assert!(!fallback_decision(Role::Responsable, Resource::Templates, Action::View));
    assert!(!fallback_decision(Role::Produccion, Resource::Envios, Action::View));
    assert!(!fallback_decision(Role::Envios, Resource::Produccion, Action::Edit));
    assert!(!fallback_decision(Role::Comercial, Resource::Almacen, Action::View));
}

#[test]
fn rank_order_governs_role_management() {
    // Admin manages every other role, nobody manages admin.
    for target in Role::ALL {
        assert_eq!(can_manage(Role::Admin, target), target != Role::Admin);
        if target != Role::Admin {
            assert!(!can_manage(target, Role::Admin));
        }
    }

    // A role never manages itself or a peer.
    for role in Role::ALL {
        assert!(!can_manage(role, role));
    }

    // Unknown manages nothing and is managed by every canonical role.
    for role in Role::CANONICAL {
        assert!(!can_manage(Role::Unknown, role));
        assert!(can_manage(role, Role::Unknown));
    }
    assert!(!can_manage(Role::Unknown, Role::Unknown));
}
