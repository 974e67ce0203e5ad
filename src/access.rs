//! Role capability table.
//!
//! Which views a role may open is decided here, once, instead of being
//! re-derived by every screen. The composition root checks this table
//! before handing a screen to the user.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Dashboard,
    BrowseBooks,
    MyBooks,
    MyReservations,
    AdminPanel,
    UserManagement,
}

static CAPABILITIES: Lazy<HashMap<Role, &'static [View]>> = Lazy::new(|| {
    use View::*;

    let mut table: HashMap<Role, &'static [View]> = HashMap::new();
    table.insert(
        Role::Student,
        &[Dashboard, BrowseBooks, MyBooks, MyReservations][..],
    );
    table.insert(
        Role::Teacher,
        &[Dashboard, BrowseBooks, MyBooks, MyReservations][..],
    );
    table.insert(Role::Librarian, &[Dashboard, BrowseBooks, AdminPanel][..]);
    table.insert(
        Role::Admin,
        &[Dashboard, BrowseBooks, AdminPanel, UserManagement][..],
    );
    table
});

pub fn permitted_views(role: Role) -> &'static [View] {
    CAPABILITIES.get(&role).copied().unwrap_or(&[])
}

pub fn can_access(role: Role, view: View) -> bool {
    permitted_views(role).contains(&view)
}
