/// Seed dataset
///
/// Users and reports carry a seed-local `key`. Tasks name their responsible
/// users and their owning report by those keys:
///
/// ```json
/// {
///   "users":   [{ "key": "ana", "nome": "Ana Souza", "cpf": "...", "setor": "TI",
///                 "email": "ana.souza@example.com", "senha": "..." }],
///   "reports": [{ "key": "desempenho", "finalidade": "...", "data": "2024-10-30T00:00:00Z",
///                 "descricao": "...", "componentes": "..." }],
///   "tasks":   [{ "nome": "...", "descricao": "...", "data": "2024-11-01T00:00:00Z",
///                 "responsaveis": ["ana"], "relatorio": "desempenho" }]
/// }
/// ```
///
/// [`Dataset::builtin`] is the standard dataset: four users, two reports and
/// four tasks.

use crate::error::{SeedError, SeedResult};
use crate::models::report::{NewReport, Report};
use crate::models::task::{join_responsibles, NewTask};
use crate::models::user::{NewUser, User};
use crate::seed::keyed::Keyed;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

const BUILTIN: &str = include_str!("../../seed/dataset.json");

/// User record with its seed key
#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub key: String,

    #[serde(flatten)]
    pub user: NewUser,
}

/// Report record with its seed key
#[derive(Debug, Clone, Deserialize)]
pub struct SeedReport {
    pub key: String,

    #[serde(flatten)]
    pub report: NewReport,
}

/// Task record referring to users and a report by seed key
#[derive(Debug, Clone, Deserialize)]
pub struct SeedTask {
    pub nome: String,
    pub descricao: String,
    pub data: DateTime<Utc>,

    /// User keys; the first one also gives the task its department
    pub responsaveis: Vec<String>,

    /// Report key
    pub relatorio: String,
}

impl SeedTask {
    /// Builds the insertable task once users and reports have ids
    ///
    /// `responsaveis` becomes the users' display names joined by `", "` and
    /// `setor` is the first listed user's department.
    ///
    /// # Errors
    ///
    /// - `SeedError::Validation` if no responsible user is listed
    /// - `SeedError::UnresolvedKey` if a user or report key is unknown
    pub fn resolve(&self, users: &Keyed<User>, reports: &Keyed<Report>) -> SeedResult<NewTask> {
        let responsible = self
            .responsaveis
            .iter()
            .map(|key| users.get(key))
            .collect::<SeedResult<Vec<&User>>>()?;

        let first = responsible.first().ok_or_else(|| self.no_responsible())?;
        let report = reports.get(&self.relatorio)?;

        Ok(NewTask {
            nome: self.nome.clone(),
            descricao: self.descricao.clone(),
            data: self.data,
            responsaveis: join_responsibles(responsible.iter().map(|u| u.nome.as_str())),
            setor: first.setor.clone(),
            relatorio_id: report.id,
        })
    }

    fn no_responsible(&self) -> SeedError {
        SeedError::Validation {
            entity: "task",
            key: self.nome.clone(),
            message: "at least one responsible user is required".to_string(),
        }
    }
}

/// Everything one seeding run inserts
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub users: Vec<SeedUser>,

    #[serde(default)]
    pub reports: Vec<SeedReport>,

    #[serde(default)]
    pub tasks: Vec<SeedTask>,
}

impl Dataset {
    /// The standard dataset shipped with the crate
    pub fn builtin() -> SeedResult<Self> {
        Self::from_json(BUILTIN)
    }

    pub fn from_json(json: &str) -> SeedResult<Self> {
        serde_json::from_str(json).map_err(|e| SeedError::Dataset(e.to_string()))
    }

    /// Reads a dataset from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Dataset` if the file cannot be read or parsed
    pub fn from_file(path: &Path) -> SeedResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| SeedError::Dataset(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Checks the dataset before anything is written
    ///
    /// # Errors
    ///
    /// - `SeedError::DuplicateKey` if a user or report key repeats
    /// - `SeedError::Validation` for a malformed user or a task without
    ///   responsible users
    /// - `SeedError::UnresolvedKey` if a task names an unknown user or report
    pub fn validate(&self) -> SeedResult<()> {
        let user_keys = unique_keys("user", self.users.iter().map(|u| u.key.as_str()))?;
        let report_keys = unique_keys("report", self.reports.iter().map(|r| r.key.as_str()))?;

        for seed in &self.users {
            seed.user.check()?;
        }

        for task in &self.tasks {
            if task.responsaveis.is_empty() {
                return Err(task.no_responsible());
            }
            for key in &task.responsaveis {
                if !user_keys.contains(key.as_str()) {
                    return Err(SeedError::UnresolvedKey {
                        entity: "user",
                        key: key.clone(),
                    });
                }
            }
            if !report_keys.contains(task.relatorio.as_str()) {
                return Err(SeedError::UnresolvedKey {
                    entity: "report",
                    key: task.relatorio.clone(),
                });
            }
        }

        Ok(())
    }
}

fn unique_keys<'a>(
    entity: &'static str,
    keys: impl Iterator<Item = &'a str>,
) -> SeedResult<HashSet<&'a str>> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(SeedError::DuplicateKey {
                entity,
                key: key.to_string(),
            });
        }
    }
    Ok(seen)
}
