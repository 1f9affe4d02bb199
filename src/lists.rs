//! Recipient lists: local CRUD, JSON export, and validated import/merge.
//!
//! A list never holds two groups with the same `identifier`. Every mutation
//! here keeps that true, including both import paths.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::utils::{name_key, new_id};

pub const EXPORT_VERSION: &str = "1.0";
pub const IMPORTED_SUFFIX: &str = " (IMPORTED)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    #[default]
    User,
    Group,
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupType::User => f.write_str("user"),
            GroupType::Group => f.write_str("group"),
        }
    }
}

impl FromStr for GroupType {
    type Err = ListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(GroupType::User),
            "group" => Ok(GroupType::Group),
            other => Err(ListError::InvalidType(other.to_string())),
        }
    }
}

/// A single recipient: a user handle or a numeric chat id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: GroupType,
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupList {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub groups: Vec<Group>,
    pub created_at: DateTime<Utc>,
}

impl GroupList {
    pub fn new(name: &str, now: DateTime<Utc>) -> Self {
        Self {
            id: new_id(),
            name: name.trim().to_string(),
            groups: Vec::new(),
            created_at: now,
        }
    }

    pub fn contains_identifier(&self, identifier: &str) -> bool {
        self.groups.iter().any(|g| g.identifier == identifier)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListError {
    #[error("list name cannot be empty")]
    EmptyName,
    #[error("recipient identifier cannot be empty")]
    EmptyIdentifier,
    #[error("list not found: {0}")]
    ListNotFound(String),
    #[error("recipient not found in list: {0}")]
    GroupNotFound(String),
    #[error("'{identifier}' is already in list '{list}'")]
    DuplicateIdentifier { identifier: String, list: String },
    #[error("invalid recipient type '{0}', expected 'user' or 'group'")]
    InvalidType(String),
    #[error("could not encode export: {0}")]
    Encode(String),
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid import file: missing 'lists'")]
    MissingLists,
    #[error("invalid import file: 'lists' must be an array")]
    ListsNotArray,
    #[error("invalid import file: list #{index}: {reason}")]
    InvalidList { index: usize, reason: String },
    #[error("invalid import file: list #{list}, recipient #{group}: {reason}")]
    InvalidGroup { list: usize, group: usize, reason: String },
    #[error("no new contacts to import")]
    NothingToImport,
    #[error(transparent)]
    Target(#[from] ListError),
}

/// Export file layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub version: String,
    pub export_date: DateTime<Utc>,
    pub lists: Vec<GroupList>,
}

/// Validated contents of an import file. Only the fields listed here are
/// required; anything else in the file (createdAt, version...) is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDocument {
    pub lists: Vec<ImportedList>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedList {
    pub id: String,
    pub name: String,
    pub groups: Vec<ImportedGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportedGroup {
    #[serde(deserialize_with = "opaque_string")]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GroupType,
    #[serde(deserialize_with = "opaque_string")]
    pub identifier: String,
}

impl ImportedGroup {
    fn into_group(self) -> Group {
        Group {
            id: new_id(),
            name: self.name,
            kind: self.kind,
            identifier: self.identifier,
        }
    }
}

/// Ids and chat identifiers show up as strings or bare numbers in hand-edited files.
fn opaque_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Deserialize)]
struct RawList {
    #[serde(deserialize_with = "opaque_string")]
    id: String,
    name: String,
    groups: Vec<Value>,
}

/// Parse and validate an import file. Nothing is merged if any list or
/// recipient fails validation.
pub fn parse_import(text: &str) -> Result<ImportDocument, ImportError> {
    let root: Value = serde_json::from_str(text)?;
    let lists = root.get("lists").ok_or(ImportError::MissingLists)?;
    let lists = lists.as_array().ok_or(ImportError::ListsNotArray)?;

    let mut out = Vec::with_capacity(lists.len());
    for (index, raw) in lists.iter().enumerate() {
        let raw = RawList::deserialize(raw).map_err(|e| ImportError::InvalidList {
            index,
            reason: e.to_string(),
        })?;
        if raw.name.trim().is_empty() {
            return Err(ImportError::InvalidList {
                index,
                reason: "field `name` is empty".into(),
            });
        }

        let mut groups = Vec::with_capacity(raw.groups.len());
        for (group, value) in raw.groups.iter().enumerate() {
            let parsed = ImportedGroup::deserialize(value).map_err(|e| ImportError::InvalidGroup {
                list: index,
                group,
                reason: e.to_string(),
            })?;
            for (field, text) in [("name", &parsed.name), ("identifier", &parsed.identifier)] {
                if text.trim().is_empty() {
                    return Err(ImportError::InvalidGroup {
                        list: index,
                        group,
                        reason: format!("field `{}` is empty", field),
                    });
                }
            }
            groups.push(parsed);
        }
        out.push(ImportedList {
            id: raw.id,
            name: raw.name,
            groups,
        });
    }

    Ok(ImportDocument { lists: out })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub lists_added: usize,
    pub groups_added: usize,
    /// (name in file, name given locally) for every list renamed on collision.
    pub renamed: Vec<(String, String)>,
}

/// All lists the user keeps locally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListCollection {
    lists: Vec<GroupList>,
}

impl ListCollection {
    pub fn new(lists: Vec<GroupList>) -> Self {
        Self { lists }
    }

    pub fn lists(&self) -> &[GroupList] {
        &self.lists
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Look a list up by id, falling back to a case-insensitive name match.
    pub fn find(&self, key: &str) -> Option<&GroupList> {
        self.position(key).map(|i| &self.lists[i])
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.lists.iter().position(|l| l.id == key).or_else(|| {
            let wanted = name_key(key);
            self.lists.iter().position(|l| name_key(&l.name) == wanted)
        })
    }

    fn get_mut(&mut self, key: &str) -> Result<&mut GroupList, ListError> {
        let idx = self
            .position(key)
            .ok_or_else(|| ListError::ListNotFound(key.to_string()))?;
        Ok(&mut self.lists[idx])
    }

    pub fn create(&mut self, name: &str, now: DateTime<Utc>) -> Result<&GroupList, ListError> {
        if name.trim().is_empty() {
            return Err(ListError::EmptyName);
        }
        self.lists.push(GroupList::new(name, now));
        Ok(&self.lists[self.lists.len() - 1])
    }

    pub fn delete(&mut self, key: &str) -> Result<GroupList, ListError> {
        let idx = self
            .position(key)
            .ok_or_else(|| ListError::ListNotFound(key.to_string()))?;
        Ok(self.lists.remove(idx))
    }

    pub fn rename(&mut self, key: &str, name: &str) -> Result<(), ListError> {
        if name.trim().is_empty() {
            return Err(ListError::EmptyName);
        }
        self.get_mut(key)?.name = name.trim().to_string();
        Ok(())
    }

    pub fn add_group(
        &mut self,
        key: &str,
        name: &str,
        kind: GroupType,
        identifier: &str,
    ) -> Result<Group, ListError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ListError::EmptyIdentifier);
        }
        let list = self.get_mut(key)?;
        if list.contains_identifier(identifier) {
            return Err(ListError::DuplicateIdentifier {
                identifier: identifier.to_string(),
                list: list.name.clone(),
            });
        }
        let name = if name.trim().is_empty() { identifier } else { name.trim() };
        let group = Group {
            id: new_id(),
            name: name.to_string(),
            kind,
            identifier: identifier.to_string(),
        };
        list.groups.push(group.clone());
        Ok(group)
    }

    /// Remove a recipient by group id or identifier.
    pub fn remove_group(&mut self, key: &str, group: &str) -> Result<Group, ListError> {
        let list = self.get_mut(key)?;
        let idx = list
            .groups
            .iter()
            .position(|g| g.id == group || g.identifier == group)
            .ok_or_else(|| ListError::GroupNotFound(group.to_string()))?;
        Ok(list.groups.remove(idx))
    }

    /// Append every list in `doc` as a new list. Existing lists are untouched;
    /// a list whose name clashes with one already present takes that list's
    /// name plus the imported suffix, numbered when the suffixed name is taken too.
    pub fn import_all(&mut self, doc: ImportDocument, now: DateTime<Utc>) -> ImportSummary {
        let mut taken: HashMap<String, String> = self
            .lists
            .iter()
            .map(|l| (name_key(&l.name), l.name.clone()))
            .collect();
        let mut summary = ImportSummary::default();

        for imported in doc.lists {
            let original = imported.name.trim().to_string();
            let name = match taken.get(&name_key(&original)) {
                Some(existing) => {
                    let renamed = imported_name(existing, &taken);
                    summary.renamed.push((original, renamed.clone()));
                    renamed
                }
                None => original,
            };
            taken.insert(name_key(&name), name.clone());

            let mut seen = HashSet::new();
            let groups: Vec<Group> = imported
                .groups
                .into_iter()
                .filter(|g| seen.insert(g.identifier.clone()))
                .map(ImportedGroup::into_group)
                .collect();

            summary.lists_added += 1;
            summary.groups_added += groups.len();
            self.lists.push(GroupList {
                id: new_id(),
                name,
                groups,
                created_at: now,
            });
        }

        log::info!(
            "imported {} lists ({} recipients)",
            summary.lists_added,
            summary.groups_added
        );
        summary
    }

    /// Pool the recipients of every list in `doc` into one existing list,
    /// skipping identifiers it already has. Returns how many were added.
    pub fn import_into(&mut self, key: &str, doc: ImportDocument) -> Result<usize, ImportError> {
        let target = self.get_mut(key)?;

        let mut seen: HashSet<String> = target.groups.iter().map(|g| g.identifier.clone()).collect();
        let fresh: Vec<Group> = doc
            .lists
            .into_iter()
            .flat_map(|l| l.groups)
            .filter(|g| seen.insert(g.identifier.clone()))
            .map(ImportedGroup::into_group)
            .collect();

        if fresh.is_empty() {
            return Err(ImportError::NothingToImport);
        }
        let added = fresh.len();
        target.groups.extend(fresh);
        log::info!("merged {} new recipients into '{}'", added, target.name);
        Ok(added)
    }

    pub fn export(&self, now: DateTime<Utc>) -> Result<String, serde_json::Error> {
        export_lists(&self.lists, now)
    }

    pub fn export_one(&self, key: &str, now: DateTime<Utc>) -> Result<String, ListError> {
        let list = self.find(key).ok_or_else(|| ListError::ListNotFound(key.to_string()))?;
        export_lists(std::slice::from_ref(list), now).map_err(|e| ListError::Encode(e.to_string()))
    }
}

fn imported_name(base: &str, taken: &HashMap<String, String>) -> String {
    let mut candidate = format!("{}{}", base, IMPORTED_SUFFIX);
    let mut n = 2;
    while taken.contains_key(&name_key(&candidate)) {
        candidate = format!("{} (IMPORTED {})", base, n);
        n += 1;
    }
    candidate
}

pub fn export_lists(lists: &[GroupList], now: DateTime<Utc>) -> Result<String, serde_json::Error> {
    let envelope = ExportEnvelope {
        version: EXPORT_VERSION.to_string(),
        export_date: now,
        lists: lists.to_vec(),
    };
    serde_json::to_string_pretty(&envelope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const TEAM: &str = r#"{"lists":[{"id":"1","name":"Team","groups":[{"id":"a","name":"Alice","type":"user","identifier":"@alice"}]}]}"#;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    fn identifiers_unique(list: &GroupList) -> bool {
        let mut seen = HashSet::new();
        list.groups.iter().all(|g| seen.insert(g.identifier.as_str()))
    }

    #[test]
    fn import_into_empty_collection() {
        let mut lists = ListCollection::default();
        let summary = lists.import_all(parse_import(TEAM).unwrap(), now());

        assert_eq!(summary.lists_added, 1);
        assert_eq!(summary.groups_added, 1);
        assert!(summary.renamed.is_empty());
        let team = &lists.lists()[0];
        assert_eq!(team.name, "Team");
        assert_eq!(team.groups.len(), 1);
        assert_ne!(team.id, "1");
        assert_ne!(team.groups[0].id, "a");
        assert_eq!(team.groups[0].identifier, "@alice");
    }

    #[test]
    fn reimport_into_same_list_adds_nothing() {
        let mut lists = ListCollection::default();
        lists.import_all(parse_import(TEAM).unwrap(), now());
        let id = lists.lists()[0].id.clone();

        let err = lists.import_into(&id, parse_import(TEAM).unwrap()).unwrap_err();
        assert!(matches!(err, ImportError::NothingToImport));
        assert_eq!(err.to_string(), "no new contacts to import");
        assert_eq!(lists.lists()[0].groups.len(), 1);
    }

    #[test]
    fn name_collision_gets_suffix_and_original_untouched() {
        let mut lists = ListCollection::default();
        lists.create("Friends", now()).unwrap();
        lists.add_group("Friends", "Bob", GroupType::User, "@bob").unwrap();
        let before = lists.lists()[0].clone();

        let doc = parse_import(
            r#"{"lists":[{"id":"x","name":"friends","groups":[{"id":"g","name":"Carol","type":"user","identifier":"@carol"}]}]}"#,
        )
        .unwrap();
        let summary = lists.import_all(doc, now());

        assert_eq!(lists.lists().len(), 2);
        assert_eq!(lists.lists()[0], before);
        assert_eq!(lists.lists()[1].name, "Friends (IMPORTED)");
        assert_eq!(summary.renamed, vec![("friends".to_string(), "Friends (IMPORTED)".to_string())]);
    }

    #[test]
    fn suffix_follows_the_existing_casing() {
        let mut lists = ListCollection::default();
        lists.create("friends", now()).unwrap();
        let doc = parse_import(r#"{"lists":[{"id":"x","name":"FRIENDS","groups":[]}]}"#).unwrap();
        lists.import_all(doc, now());
        assert_eq!(lists.lists()[1].name, "friends (IMPORTED)");
    }

    #[test]
    fn repeated_imports_get_distinct_names() {
        let doc = r#"{"lists":[{"id":"x","name":"friends","groups":[]}]}"#;
        let mut lists = ListCollection::default();
        lists.create("Friends", now()).unwrap();
        for _ in 0..3 {
            lists.import_all(parse_import(doc).unwrap(), now());
        }
        let names: Vec<&str> = lists.lists().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Friends", "Friends (IMPORTED)", "Friends (IMPORTED 2)", "Friends (IMPORTED 3)"]
        );
        assert_eq!(lists.find("friends (imported 2)").unwrap().name, "Friends (IMPORTED 2)");
    }

    #[test]
    fn same_name_twice_in_one_file() {
        let doc = parse_import(
            r#"{"lists":[{"id":"1","name":"Team","groups":[]},{"id":"2","name":"team","groups":[]}]}"#,
        )
        .unwrap();
        let mut lists = ListCollection::default();
        let summary = lists.import_all(doc, now());
        assert_eq!(lists.lists()[0].name, "Team");
        assert_eq!(lists.lists()[1].name, "Team (IMPORTED)");
        assert_eq!(summary.renamed.len(), 1);
    }

    #[test]
    fn targeted_import_pools_lists_and_skips_known_identifiers() {
        let mut lists = ListCollection::default();
        lists.create("Ops", now()).unwrap();
        lists.add_group("Ops", "Alice", GroupType::User, "@alice").unwrap();

        let doc = parse_import(
            r#"{"lists":[
                {"id":"1","name":"A","groups":[
                    {"id":"1","name":"Alice again","type":"user","identifier":"@alice"},
                    {"id":"2","name":"Dev chat","type":"group","identifier":"-100123"}
                ]},
                {"id":"2","name":"B","groups":[
                    {"id":"3","name":"Dev chat dup","type":"group","identifier":"-100123"},
                    {"id":"4","name":"Eve","type":"user","identifier":"@eve"}
                ]}
            ]}"#,
        )
        .unwrap();

        let added = lists.import_into("ops", doc).unwrap();
        assert_eq!(added, 2);
        let ops = lists.find("Ops").unwrap();
        assert_eq!(ops.groups.len(), 3);
        assert!(identifiers_unique(ops));
        assert_eq!(ops.groups[1].name, "Dev chat");
        assert_eq!(ops.groups[1].kind, GroupType::Group);
    }

    #[test]
    fn whole_import_collapses_duplicates_inside_a_list() {
        let doc = parse_import(
            r#"{"lists":[{"id":"1","name":"Dupes","groups":[
                {"id":"1","name":"A","type":"user","identifier":"@a"},
                {"id":"2","name":"A2","type":"user","identifier":"@a"}
            ]}]}"#,
        )
        .unwrap();
        let mut lists = ListCollection::default();
        let summary = lists.import_all(doc, now());
        assert_eq!(summary.groups_added, 1);
        assert!(identifiers_unique(&lists.lists()[0]));
    }

    #[test]
    fn export_then_import_preserves_recipients() {
        let mut lists = ListCollection::default();
        lists.create("Team", now()).unwrap();
        lists.add_group("Team", "Alice", GroupType::User, "@alice").unwrap();
        lists.add_group("Team", "Builds", GroupType::Group, "-100555").unwrap();

        let json = lists.export(now()).unwrap();
        let envelope: ExportEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(envelope.version, EXPORT_VERSION);
        assert_eq!(envelope.export_date, now());

        let mut fresh = ListCollection::default();
        fresh.import_all(parse_import(&json).unwrap(), now());

        let strip = |l: &GroupList| -> Vec<(String, GroupType, String)> {
            l.groups.iter().map(|g| (g.name.clone(), g.kind, g.identifier.clone())).collect()
        };
        assert_eq!(strip(&fresh.lists()[0]), strip(&lists.lists()[0]));
    }

    #[test]
    fn export_uses_camel_case_envelope() {
        let json = export_lists(&[], now()).unwrap();
        let v: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["version"], "1.0");
        assert!(v["exportDate"].is_string());
        assert!(v["lists"].as_array().unwrap().is_empty());
    }

    #[test]
    fn rejects_missing_or_non_array_lists() {
        assert!(matches!(parse_import("{}"), Err(ImportError::MissingLists)));
        assert!(matches!(parse_import(r#"{"lists":{}}"#), Err(ImportError::ListsNotArray)));
        assert!(matches!(parse_import("not json"), Err(ImportError::Json(_))));
    }

    #[test]
    fn rejects_list_without_groups() {
        let err = parse_import(r#"{"lists":[{"id":"1","name":"T"}]}"#).unwrap_err();
        match err {
            ImportError::InvalidList { index, reason } => {
                assert_eq!(index, 0);
                assert!(reason.contains("groups"), "{reason}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_group_missing_identifier() {
        let err = parse_import(
            r#"{"lists":[{"id":"1","name":"T","groups":[{"id":"a","name":"A","type":"user"}]}]}"#,
        )
        .unwrap_err();
        match err {
            ImportError::InvalidGroup { list, group, reason } => {
                assert_eq!((list, group), (0, 0));
                assert!(reason.contains("identifier"), "{reason}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_group_type() {
        let err = parse_import(
            r#"{"lists":[{"id":"1","name":"T","groups":[{"id":"a","name":"A","type":"channel","identifier":"@a"}]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ImportError::InvalidGroup { .. }));
        assert!(err.to_string().contains("channel"));
    }

    #[test]
    fn rejects_blank_identifier() {
        let err = parse_import(
            r#"{"lists":[{"id":"1","name":"T","groups":[{"id":"a","name":"A","type":"user","identifier":"  "}]}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("identifier"));
    }

    #[test]
    fn accepts_numeric_ids_and_identifiers() {
        let doc = parse_import(
            r#"{"lists":[{"id":7,"name":"T","groups":[{"id":1,"name":"Chat","type":"group","identifier":-100987}]}]}"#,
        )
        .unwrap();
        assert_eq!(doc.lists[0].id, "7");
        assert_eq!(doc.lists[0].groups[0].identifier, "-100987");
    }

    #[test]
    fn add_group_rejects_duplicate_identifier() {
        let mut lists = ListCollection::default();
        lists.create("Team", now()).unwrap();
        lists.add_group("Team", "Alice", GroupType::User, "@alice").unwrap();
        let err = lists.add_group("Team", "Alice 2", GroupType::User, " @alice ").unwrap_err();
        assert_eq!(
            err,
            ListError::DuplicateIdentifier { identifier: "@alice".into(), list: "Team".into() }
        );
    }

    #[test]
    fn crud_by_name_or_id() {
        let mut lists = ListCollection::default();
        assert_eq!(lists.create("  ", now()).unwrap_err(), ListError::EmptyName);
        let id = lists.create("Team", now()).unwrap().id.clone();
        let g = lists.add_group(&id, "", GroupType::User, "@zed").unwrap();
        assert_eq!(g.name, "@zed");

        lists.rename("team", "Core").unwrap();
        assert_eq!(lists.find(&id).unwrap().name, "Core");

        lists.remove_group("Core", "@zed").unwrap();
        assert!(lists.find("core").unwrap().groups.is_empty());
        assert!(matches!(lists.remove_group("Core", "@zed"), Err(ListError::GroupNotFound(_))));

        lists.delete(&id).unwrap();
        assert!(lists.is_empty());
        assert!(matches!(lists.delete(&id), Err(ListError::ListNotFound(_))));
    }

    #[test]
    fn group_type_parses_case_insensitively() {
        assert_eq!("Group".parse::<GroupType>().unwrap(), GroupType::Group);
        assert!("channel".parse::<GroupType>().is_err());
    }
}
