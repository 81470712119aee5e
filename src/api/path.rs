//! Segment-shifting path resolution for the team resource tree
//!
//! Each level peels the head segment off the path and hands the rooted tail
//! to the next level down, so the tree below reads the same way it nests:
//!
//! ```text
//! /teams                  GET, POST
//! /teams/{uuid}           GET
//! /teams/{uuid}/summary   GET
//! /teams/{uuid}/members   GET
//! /teams/{uuid}/request   POST
//! ```

use axum::http::Method;

/// A resolved request target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    ListTeams,
    ProvisionTeam,
    GetTeam(String),
    TeamSummary(String),
    TeamMembers(String),
    JoinRequest(String),
}

/// Why a path and method did not resolve to a route
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    NotFound,
    MethodNotAllowed { allowed: &'static [&'static str] },
}

/// Split a path into its first segment and the rooted remainder.
///
/// The path is cleaned first: repeated slashes collapse, `.` segments are
/// dropped and `..` removes the preceding segment. The tail never carries a
/// trailing slash and is `/` when nothing remains.
pub fn shift_path(path: &str) -> (String, String) {
    let cleaned = clean_path(path);
    let rest = &cleaned[1..];

    match rest.find('/') {
        Some(i) => (rest[..i].to_string(), rest[i..].to_string()),
        None => (rest.to_string(), "/".to_string()),
    }
}

/// Resolve a request to a route
pub fn resolve(method: &Method, path: &str) -> Result<Route, RouteError> {
    let (head, tail) = shift_path(path);

    match head.as_str() {
        "teams" => resolve_teams(method, &tail),
        _ => Err(RouteError::NotFound),
    }
}

fn resolve_teams(method: &Method, path: &str) -> Result<Route, RouteError> {
    let (head, tail) = shift_path(path);

    if head.is_empty() {
        return if *method == Method::GET {
            Ok(Route::ListTeams)
        } else if *method == Method::POST {
            Ok(Route::ProvisionTeam)
        } else {
            Err(RouteError::MethodNotAllowed {
                allowed: &["GET", "POST"],
            })
        };
    }

    resolve_team(method, head, &tail)
}

fn resolve_team(method: &Method, team_id: String, path: &str) -> Result<Route, RouteError> {
    let (head, tail) = shift_path(path);

    if tail != "/" {
        return Err(RouteError::NotFound);
    }

    match head.as_str() {
        "" => only(method, &Method::GET, Route::GetTeam(team_id)),
        "summary" => only(method, &Method::GET, Route::TeamSummary(team_id)),
        "members" => only(method, &Method::GET, Route::TeamMembers(team_id)),
        "request" => only(method, &Method::POST, Route::JoinRequest(team_id)),
        _ => Err(RouteError::NotFound),
    }
}

fn only(method: &Method, expected: &Method, route: Route) -> Result<Route, RouteError> {
    if method == expected {
        return Ok(route);
    }

    let allowed: &'static [&'static str] = if *expected == Method::POST {
        &["POST"]
    } else {
        &["GET"]
    };

    Err(RouteError::MethodNotAllowed { allowed })
}

fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    format!("/{}", segments.join("/"))
}
