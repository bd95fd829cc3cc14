//! Precedence merge of candidate field sources.
//!
//! A non-empty value already in `existing` (user-edited) wins; otherwise a
//! non-empty value from the structured parser; otherwise the heuristic;
//! otherwise the field default. List fields are taken wholesale from the
//! winning source, never merged element-wise. The merge is idempotent and
//! never replaces a non-empty field with an empty one.

use crate::profile::heuristic::PartialProfile;
use crate::profile::{normalize_tech_stack, Profile};

pub fn reconcile(
    existing: &Profile,
    heuristic: &PartialProfile,
    structured: Option<&Profile>,
) -> Profile {
    Profile {
        name: pick_str(
            &existing.name,
            structured.map(|p| p.name.as_str()),
            Some(&heuristic.name),
        ),
        email: pick_str(
            &existing.email,
            structured.map(|p| p.email.as_str()),
            Some(&heuristic.email),
        ),
        phone: pick_str(
            &existing.phone,
            structured.map(|p| p.phone.as_str()),
            Some(&heuristic.phone),
        ),
        location: pick_str(
            &existing.location,
            structured.map(|p| p.location.as_str()),
            Some(&heuristic.location),
        ),
        years_experience: pick_years(
            existing.years_experience,
            structured.map(|p| p.years_experience),
            Some(heuristic.years_experience),
        ),
        tech_stack: normalize_tech_stack(pick_list(
            &existing.tech_stack,
            structured.map(|p| &p.tech_stack),
            Some(&heuristic.tech_stack),
        )),
        desired_positions: pick_list(
            &existing.desired_positions,
            structured.map(|p| &p.desired_positions),
            None,
        ),
        projects: pick_list(&existing.projects, structured.map(|p| &p.projects), None),
    }
}

fn pick_str(existing: &str, structured: Option<&str>, heuristic: Option<&str>) -> String {
    if !existing.is_empty() {
        return existing.to_string();
    }
    if let Some(s) = structured {
        if !s.is_empty() {
            return s.to_string();
        }
    }
    if let Some(h) = heuristic {
        if !h.is_empty() {
            return h.to_string();
        }
    }
    String::new()
}

fn pick_years(existing: u8, structured: Option<u8>, heuristic: Option<u8>) -> u8 {
    if existing != 0 {
        return existing;
    }
    if let Some(s) = structured {
        if s != 0 {
            return s;
        }
    }
    heuristic.unwrap_or(0)
}

fn pick_list<T: Clone>(existing: &[T], structured: Option<&Vec<T>>, heuristic: Option<&Vec<T>>) -> Vec<T> {
    if !existing.is_empty() {
        return existing.to_vec();
    }
    if let Some(s) = structured {
        if !s.is_empty() {
            return s.clone();
        }
    }
    if let Some(h) = heuristic {
        if !h.is_empty() {
            return h.clone();
        }
    }
    Vec::new()
}
