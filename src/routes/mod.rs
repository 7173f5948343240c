/// Router Module Index
///
/// Organizes the application's routing logic into prefix-segregated modules,
/// one per protected region of the route space. The access gate applied at the
/// single routing entry point (see `create_router`) is what actually enforces
/// the prefix-to-role policy; the module split keeps each region's surface
/// explicit and prevents accidental exposure of protected endpoints.

/// Routes accessible to all callers (anonymous, plus the session entry/exit points).
pub mod public;

/// Routes under "/user": any authenticated customer account.
pub mod user;

/// Routes under "/vet": the vet's schedule and shift claims.
pub mod vet;

/// Routes under "/clinic": clinic operators managing customers, shifts, invitations.
pub mod clinic;

/// Routes under "/staff": the cross-clinic shift board and customer book.
pub mod staff;

/// Routes under "/admin": platform oversight. Handlers re-check the Admin role.
pub mod admin;
