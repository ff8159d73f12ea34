//! Folds the role/association rows of one user into an [`AccessScope`].
//!
//! The rows are reduced once into de-duplicated sets, then every role family
//! is evaluated against [`FAMILY_RULES`]. Families are independent of each
//! other: a single user may come out as an admin, a teacher and a team member
//! at the same time when the join returns rows for all three.

use std::collections::BTreeSet;

use crate::models::access::{
    AccessRow, AccessScope, AdminScope, ClassScope, EntityScope, FundSourceAdminScope,
    FundSourceScope, TeamScope,
};

pub const USER_TYPE_TEACHER: i64 = 1;
pub const USER_TYPE_ADMIN: i64 = 3;
pub const USER_TYPE_TEAM_MEMBER: i64 = 5;
pub const USER_TYPE_FUND_SOURCE_ADMIN: i64 = 7;

const TEACHER_TYPE_TEACHER: i64 = 1;
const TEACHER_TYPE_CO_TEACHER: i64 = 2;
const TEACHER_TYPE_ASSISTANT: i64 = 3;

/// How the primary role and the data gate combine for a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Eligibility {
    /// The primary role must match and the gate must hold.
    RoleAndData,
    /// Either the primary role matches or the gate holds.
    RoleOrData,
}

struct FamilyRule {
    name: &'static str,
    user_type_id: i64,
    eligibility: Eligibility,
    has_data: fn(&FoldedRows) -> bool,
    assign: fn(&mut AccessScope, &mut FoldedRows, &AccessRow),
}

const FAMILY_RULES: &[FamilyRule] = &[
    FamilyRule {
        name: "admin",
        user_type_id: USER_TYPE_ADMIN,
        eligibility: Eligibility::RoleAndData,
        has_data: |folded| !folded.admin_entities.is_empty(),
        assign: assign_admin,
    },
    FamilyRule {
        name: "fund_source_admin",
        user_type_id: USER_TYPE_FUND_SOURCE_ADMIN,
        eligibility: Eligibility::RoleAndData,
        // gated on fund sources, not on the linked entities
        has_data: |folded| !folded.fund_sources.is_empty(),
        assign: assign_fund_source_admin,
    },
    FamilyRule {
        name: "teacher",
        user_type_id: USER_TYPE_TEACHER,
        eligibility: Eligibility::RoleOrData,
        has_data: |folded| !folded.teacher_classes.is_empty(),
        assign: |scope, folded, _| {
            scope.teacher = Some(ClassScope {
                classes: std::mem::take(&mut folded.teacher_classes),
            })
        },
    },
    FamilyRule {
        name: "co_teacher",
        user_type_id: USER_TYPE_TEACHER,
        eligibility: Eligibility::RoleAndData,
        has_data: |folded| !folded.co_teacher_classes.is_empty(),
        assign: |scope, folded, _| {
            scope.co_teacher = Some(ClassScope {
                classes: std::mem::take(&mut folded.co_teacher_classes),
            })
        },
    },
    FamilyRule {
        name: "assistant_teacher",
        user_type_id: USER_TYPE_TEACHER,
        eligibility: Eligibility::RoleAndData,
        has_data: |folded| !folded.assistant_classes.is_empty(),
        assign: |scope, folded, _| {
            scope.assistant_teacher = Some(ClassScope {
                classes: std::mem::take(&mut folded.assistant_classes),
            })
        },
    },
    FamilyRule {
        name: "team_member",
        user_type_id: USER_TYPE_TEAM_MEMBER,
        eligibility: Eligibility::RoleOrData,
        has_data: |folded| !folded.team_children.is_empty(),
        assign: |scope, folded, _| {
            scope.team_member = Some(TeamScope {
                children: std::mem::take(&mut folded.team_children),
            })
        },
    },
];

/// Distinct association values collected across every row.
#[derive(Debug, Default)]
struct FoldedRows {
    admin_entities: BTreeSet<i64>,
    fs_admin_entities: BTreeSet<i64>,
    fund_sources: BTreeSet<i64>,
    teacher_classes: BTreeSet<i64>,
    co_teacher_classes: BTreeSet<i64>,
    assistant_classes: BTreeSet<i64>,
    team_children: BTreeSet<i64>,
}

impl FoldedRows {
    fn fold(rows: &[AccessRow]) -> Self {
        let mut folded = FoldedRows::default();
        for row in rows {
            folded.admin_entities.extend(row.admin_entity_id);
            folded.fs_admin_entities.extend(row.fs_admin_entity_id);
            folded.fund_sources.extend(row.fund_source_id);
            folded.team_children.extend(row.team_child_id);

            if let (Some(teacher_type_id), Some(class_id)) = (row.teacher_type_id, row.class_id) {
                match teacher_type_id {
                    TEACHER_TYPE_TEACHER => folded.teacher_classes.insert(class_id),
                    TEACHER_TYPE_CO_TEACHER => folded.co_teacher_classes.insert(class_id),
                    TEACHER_TYPE_ASSISTANT => folded.assistant_classes.insert(class_id),
                    _ => false,
                };
            }
        }
        folded
    }
}

fn assign_admin(scope: &mut AccessScope, folded: &mut FoldedRows, first: &AccessRow) {
    let entities = EntityScope {
        entities: std::mem::take(&mut folded.admin_entities),
    };
    scope.admin = match first.admin_type_id {
        Some(0) => Some(AdminScope::Standard(entities)),
        Some(1) => Some(AdminScope::Vo(entities)),
        Some(2) => Some(AdminScope::VoNoChild(entities)),
        _ => None,
    };
}

fn assign_fund_source_admin(scope: &mut AccessScope, folded: &mut FoldedRows, first: &AccessRow) {
    let fund_source_scope = FundSourceScope {
        entities: std::mem::take(&mut folded.fs_admin_entities),
        fund_sources: std::mem::take(&mut folded.fund_sources),
    };
    scope.fs_admin = match first.fund_source_admin_type_id {
        Some(0) => Some(FundSourceAdminScope::Standard(fund_source_scope)),
        Some(1) => Some(FundSourceAdminScope::Vo(fund_source_scope)),
        _ => None,
    };
}

/// Converts the full row set of one user into its scope document.
///
/// Total over any input: an empty row set, or one whose first row carries no
/// primary role, yields the bare scope with `super_user = false`.
pub fn convert(rows: &[AccessRow]) -> AccessScope {
    let mut scope = AccessScope::default();

    let Some(first) = rows.first() else {
        return scope;
    };
    let Some(user_type_id) = first.user_type_id else {
        return scope;
    };

    scope.super_user = first.super_user_type_id.map_or(false, |id| id != 0);

    let mut folded = FoldedRows::fold(rows);
    for rule in FAMILY_RULES {
        let role_matches = rule.user_type_id == user_type_id;
        let has_data = (rule.has_data)(&folded);
        let eligible = match rule.eligibility {
            Eligibility::RoleAndData => role_matches && has_data,
            Eligibility::RoleOrData => role_matches || has_data,
        };
        if eligible {
            tracing::trace!(family = rule.name, user_type_id, "role family granted");
            (rule.assign)(&mut scope, &mut folded, first);
        }
    }

    scope
}
