use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One row of the role/association join for a single user.
///
/// The role columns (`user_type_id`, `admin_type_id`, `fund_source_admin_type_id`,
/// `super_user_type_id`) are identical on every row of a lookup and are read
/// from the first row. The association columns vary row to row and are `None`
/// wherever the join found no matching side.
#[derive(Debug, Clone, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct AccessRow {
    pub user_type_id: Option<i64>,
    pub admin_type_id: Option<i64>,
    pub fund_source_admin_type_id: Option<i64>,
    pub super_user_type_id: Option<i64>,
    pub fund_source_id: Option<i64>,
    pub admin_entity_id: Option<i64>,
    pub fs_admin_entity_id: Option<i64>,
    pub class_id: Option<i64>,
    pub teacher_type_id: Option<i64>,
    pub team_child_id: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityScope {
    #[serde(rename = "ent", default, skip_serializing_if = "BTreeSet::is_empty")]
    pub entities: BTreeSet<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundSourceScope {
    #[serde(rename = "ent", default, skip_serializing_if = "BTreeSet::is_empty")]
    pub entities: BTreeSet<i64>,
    #[serde(rename = "fundSrc", default, skip_serializing_if = "BTreeSet::is_empty")]
    pub fund_sources: BTreeSet<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassScope {
    #[serde(rename = "cls", default, skip_serializing_if = "BTreeSet::is_empty")]
    pub classes: BTreeSet<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamScope {
    #[serde(rename = "kid", default, skip_serializing_if = "BTreeSet::is_empty")]
    pub children: BTreeSet<i64>,
}

/// Admin variant, selected by `AdminTypeID`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminScope {
    Standard(EntityScope),
    Vo(EntityScope),
    VoNoChild(EntityScope),
}

/// Fund source admin variant, selected by `FundSourceAdminTypeID`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundSourceAdminScope {
    Standard(FundSourceScope),
    Vo(FundSourceScope),
}

/// Folded authorization scope for one user.
///
/// Serialized through [`AccessScopeDocument`], which carries the flat keyed
/// layout callers consume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "AccessScopeDocument", try_from = "AccessScopeDocument")]
pub struct AccessScope {
    pub super_user: bool,
    pub admin: Option<AdminScope>,
    pub fs_admin: Option<FundSourceAdminScope>,
    pub teacher: Option<ClassScope>,
    pub co_teacher: Option<ClassScope>,
    pub assistant_teacher: Option<ClassScope>,
    pub team_member: Option<TeamScope>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AccessScopeDocument {
    #[serde(rename = "SuperUser", default)]
    pub super_user: bool,
    #[serde(rename = "Admin", default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<EntityScope>,
    #[serde(rename = "VOAdmin", default, skip_serializing_if = "Option::is_none")]
    pub vo_admin: Option<EntityScope>,
    #[serde(rename = "VONoChildAdmin", default, skip_serializing_if = "Option::is_none")]
    pub vo_no_child_admin: Option<EntityScope>,
    #[serde(rename = "FSAdmin", default, skip_serializing_if = "Option::is_none")]
    pub fs_admin: Option<FundSourceScope>,
    #[serde(rename = "FSVOAdmin", default, skip_serializing_if = "Option::is_none")]
    pub fs_vo_admin: Option<FundSourceScope>,
    #[serde(rename = "Teacher", default, skip_serializing_if = "Option::is_none")]
    pub teacher: Option<ClassScope>,
    #[serde(rename = "CoTeacher", default, skip_serializing_if = "Option::is_none")]
    pub co_teacher: Option<ClassScope>,
    #[serde(rename = "AssistantTeacher", default, skip_serializing_if = "Option::is_none")]
    pub assistant_teacher: Option<ClassScope>,
    #[serde(rename = "TeamMember", default, skip_serializing_if = "Option::is_none")]
    pub team_member: Option<TeamScope>,
}

impl From<AccessScope> for AccessScopeDocument {
    fn from(scope: AccessScope) -> Self {
        let mut document = AccessScopeDocument {
            super_user: scope.super_user,
            teacher: scope.teacher,
            co_teacher: scope.co_teacher,
            assistant_teacher: scope.assistant_teacher,
            team_member: scope.team_member,
            ..Default::default()
        };

        match scope.admin {
            Some(AdminScope::Standard(entities)) => document.admin = Some(entities),
            Some(AdminScope::Vo(entities)) => document.vo_admin = Some(entities),
            Some(AdminScope::VoNoChild(entities)) => document.vo_no_child_admin = Some(entities),
            None => {}
        }

        match scope.fs_admin {
            Some(FundSourceAdminScope::Standard(scope)) => document.fs_admin = Some(scope),
            Some(FundSourceAdminScope::Vo(scope)) => document.fs_vo_admin = Some(scope),
            None => {}
        }

        document
    }
}

impl TryFrom<AccessScopeDocument> for AccessScope {
    type Error = String;

    fn try_from(document: AccessScopeDocument) -> Result<Self, Self::Error> {
        let admin = match (
            document.admin,
            document.vo_admin,
            document.vo_no_child_admin,
        ) {
            (None, None, None) => None,
            (Some(entities), None, None) => Some(AdminScope::Standard(entities)),
            (None, Some(entities), None) => Some(AdminScope::Vo(entities)),
            (None, None, Some(entities)) => Some(AdminScope::VoNoChild(entities)),
            _ => return Err("at most one of Admin, VOAdmin, VONoChildAdmin may be present".into()),
        };

        let fs_admin = match (document.fs_admin, document.fs_vo_admin) {
            (None, None) => None,
            (Some(scope), None) => Some(FundSourceAdminScope::Standard(scope)),
            (None, Some(scope)) => Some(FundSourceAdminScope::Vo(scope)),
            _ => return Err("at most one of FSAdmin, FSVOAdmin may be present".into()),
        };

        Ok(AccessScope {
            super_user: document.super_user,
            admin,
            fs_admin,
            teacher: document.teacher,
            co_teacher: document.co_teacher,
            assistant_teacher: document.assistant_teacher,
            team_member: document.team_member,
        })
    }
}
