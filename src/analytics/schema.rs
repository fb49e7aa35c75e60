//! Column-role resolution.
//!
//! Headers are matched against a fixed keyword set per role. Each role must
//! resolve to exactly one column; anything else is an `AmbiguousSchema` error
//! naming the role and the conflicting headers. We never guess.

use crate::domain::{ColumnRoles, Role};
use crate::error::PipelineError;

/// Outcome of matching one role against the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleMatch {
    Resolved(usize),
    Missing,
    Ambiguous(Vec<String>),
}

/// Lowercase a header and strip whitespace and a UTF-8 BOM.
///
/// Excel sometimes writes a BOM in front of the first header; without this
/// the first column would never match anything.
pub fn normalize_header_name(name: &str) -> String {
    let name = name.trim().trim_start_matches('\u{feff}').trim();
    name.to_lowercase()
}

/// Match a single role against every header.
pub fn match_role(headers: &[String], role: Role) -> RoleMatch {
    let hits: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| {
            let name = normalize_header_name(name);
            role.keywords().iter().any(|k| name.contains(k))
        })
        .map(|(idx, _)| idx)
        .collect();

    match hits.as_slice() {
        [] => RoleMatch::Missing,
        [idx] => RoleMatch::Resolved(*idx),
        _ => RoleMatch::Ambiguous(hits.iter().map(|&i| headers[i].clone()).collect()),
    }
}

/// Resolve all four roles.
///
/// Every role is matched against the full header, so a column whose name
/// carries two roles' keywords (`Sales_Date`) makes both roles ambiguous.
/// The first failing role in `Role::ALL` order is reported.
pub fn resolve_roles(headers: &[String]) -> Result<ColumnRoles, PipelineError> {
    let resolve = |role: Role| match match_role(headers, role) {
        RoleMatch::Resolved(idx) => Ok(idx),
        RoleMatch::Missing => Err(PipelineError::AmbiguousSchema {
            role,
            candidates: Vec::new(),
        }),
        RoleMatch::Ambiguous(candidates) => Err(PipelineError::AmbiguousSchema { role, candidates }),
    };

    Ok(ColumnRoles {
        date: resolve(Role::Date)?,
        amount: resolve(Role::Amount)?,
        region: resolve(Role::Region)?,
        category: resolve(Role::Category)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn order_date_is_the_date_column() {
        let h = headers(&["Order_ID", "Order_Date", "Revenue", "Market", "Category"]);
        assert_eq!(match_role(&h, Role::Date), RoleMatch::Resolved(1));

        let roles = resolve_roles(&h).unwrap();
        assert_eq!(roles.date, 1);
        assert_eq!(roles.amount, 2);
        assert_eq!(roles.region, 3);
        assert_eq!(roles.category, 4);
    }

    #[test]
    fn sales_date_makes_amount_ambiguous() {
        let h = headers(&["Sales_Date", "Sales", "Region", "Product"]);
        assert_eq!(match_role(&h, Role::Date), RoleMatch::Resolved(0));
        match resolve_roles(&h) {
            Err(PipelineError::AmbiguousSchema { role, candidates }) => {
                assert_eq!(role, Role::Amount);
                assert_eq!(candidates, vec!["Sales_Date", "Sales"]);
            }
            other => panic!("expected AmbiguousSchema, got {other:?}"),
        }
    }

    #[test]
    fn shared_keyword_is_ambiguous_regardless_of_order() {
        let h = headers(&["Date", "Region_Sales", "Region", "Product"]);
        match resolve_roles(&h) {
            Err(PipelineError::AmbiguousSchema { role, candidates }) => {
                assert_eq!(role, Role::Region);
                assert_eq!(candidates, vec!["Region_Sales", "Region"]);
            }
            other => panic!("expected AmbiguousSchema, got {other:?}"),
        }
    }

    #[test]
    fn two_region_columns_are_ambiguous() {
        let h = headers(&["Date", "Sales", "Region", "Sub_Region", "Product"]);
        assert_eq!(
            match_role(&h, Role::Region),
            RoleMatch::Ambiguous(vec!["Region".to_string(), "Sub_Region".to_string()])
        );

        match resolve_roles(&h) {
            Err(PipelineError::AmbiguousSchema { role, candidates }) => {
                assert_eq!(role, Role::Region);
                assert_eq!(candidates, vec!["Region", "Sub_Region"]);
            }
            other => panic!("expected AmbiguousSchema, got {other:?}"),
        }
    }

    #[test]
    fn missing_role_is_reported() {
        let h = headers(&["Date", "Region", "Product"]);
        match resolve_roles(&h) {
            Err(PipelineError::AmbiguousSchema { role, candidates }) => {
                assert_eq!(role, Role::Amount);
                assert!(candidates.is_empty());
            }
            other => panic!("expected AmbiguousSchema, got {other:?}"),
        }
    }

    #[test]
    fn matching_is_case_insensitive_and_bom_tolerant() {
        let h = headers(&["\u{feff}ORDER DATE", "total REVENUE", "COUNTRY", "product line"]);
        let roles = resolve_roles(&h).unwrap();
        assert_eq!(
            (roles.date, roles.amount, roles.region, roles.category),
            (0, 1, 2, 3)
        );
    }
}
