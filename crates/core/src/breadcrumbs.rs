//! Breadcrumb resolver
//!
//! Turns a navigable path into an ordered trail of labeled entries. Labels
//! come from a static path table, then from an ordered list of route
//! patterns (first match wins), then from a fallback that prettifies the raw
//! segment, so every path resolves.

use crate::config::{BreadcrumbConfig, ConfigError};
use crate::models::{BreadcrumbItem, BreadcrumbTrail, Role};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

/// Label of the role home entry
pub const HOME_LABEL: &str = "Início";

const STATIC_LABELS: &[(&str, &str)] = &[
    // Admin area
    ("/admin", "Admin"),
    ("/admin/dashboard", "Dashboard"),
    ("/admin/personais", "Personais"),
    ("/admin/alunos", "Alunos"),
    ("/admin/planos", "Planos"),
    ("/admin/assinaturas", "Assinaturas"),
    ("/admin/estatisticas", "Estatísticas"),
    ("/admin/configuracoes", "Configurações"),
    // Personal area
    ("/personal", "Personal"),
    ("/personal/dashboard", "Dashboard"),
    ("/personal/alunos", "Alunos"),
    ("/personal/alunos/novo", "Novo Aluno"),
    ("/personal/treinos", "Treinos"),
    ("/personal/treinos/novo", "Novo Treino"),
    ("/personal/exercicios", "Exercícios"),
    ("/personal/exercicios/novo", "Novo Exercício"),
    ("/personal/avaliacoes", "Avaliações"),
    ("/personal/financeiro", "Financeiro"),
    ("/personal/plano", "Meu Plano"),
    ("/personal/perfil", "Meu Perfil"),
    // Student area
    ("/aluno", "Aluno"),
    ("/aluno/dashboard", "Dashboard"),
    ("/aluno/treinos", "Meus Treinos"),
    ("/aluno/historico", "Histórico"),
    ("/aluno/avaliacoes", "Minhas Avaliações"),
    ("/aluno/perfil", "Meu Perfil"),
];

const DYNAMIC_ROUTES: &[(&str, &str)] = &[
    (r"^/admin/personais/[^/]+$", "Detalhes do Personal"),
    (r"^/admin/alunos/[^/]+$", "Detalhes do Aluno"),
    (r"^/personal/alunos/[^/]+$", "Detalhes do Aluno"),
    (r"^/personal/alunos/[^/]+/historico$", "Histórico do Aluno"),
    (r"^/personal/alunos/[^/]+/editar$", "Editar Aluno"),
    (r"^/personal/treinos/[^/]+$", "Detalhes do Treino"),
    (r"^/personal/treinos/[^/]+/editar$", "Editar Treino"),
    (r"^/personal/exercicios/[^/]+/editar$", "Editar Exercício"),
    (r"^/aluno/treinos/[^/]+$", "Treino"),
];

static DEFAULT_RESOLVER: Lazy<BreadcrumbResolver> = Lazy::new(BreadcrumbResolver::new);

/// A rule mapping a cumulative path to a label
#[derive(Debug, Clone)]
pub enum LabelRule {
    /// Exact full-path match
    Exact { path: String, label: String },
    /// Regular expression over the cumulative path
    Pattern { regex: Regex, label: String },
}

impl LabelRule {
    /// Label for `path` if this rule applies
    pub fn apply(&self, path: &str) -> Option<&str> {
        match self {
            LabelRule::Exact { path: p, label } => (p == path).then_some(label.as_str()),
            LabelRule::Pattern { regex, label } => regex.is_match(path).then_some(label.as_str()),
        }
    }
}

/// Resolves paths into breadcrumb trails
#[derive(Debug, Clone)]
pub struct BreadcrumbResolver {
    exact: HashMap<String, String>,
    patterns: Vec<LabelRule>,
}

impl Default for BreadcrumbResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl BreadcrumbResolver {
    /// Create a resolver with the built-in label tables
    pub fn new() -> Self {
        let exact = STATIC_LABELS
            .iter()
            .map(|(p, l)| (p.to_string(), l.to_string()))
            .collect();

        // Built-in patterns are constants known to compile
        let patterns = DYNAMIC_ROUTES
            .iter()
            .filter_map(|(pattern, label)| {
                Regex::new(pattern).ok().map(|regex| LabelRule::Pattern {
                    regex,
                    label: label.to_string(),
                })
            })
            .collect();

        Self { exact, patterns }
    }

    /// Create a resolver with the built-in tables extended by configuration
    pub fn with_config(config: &BreadcrumbConfig) -> Result<Self, ConfigError> {
        let mut resolver = Self::new();
        for (path, label) in &config.labels {
            resolver.exact.insert(path.clone(), label.clone());
        }
        for extra in &config.patterns {
            let regex = Regex::new(&extra.pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: extra.pattern.clone(),
                source,
            })?;
            resolver.patterns.push(LabelRule::Pattern {
                regex,
                label: extra.label.clone(),
            });
        }
        Ok(resolver)
    }

    /// Shared resolver with the built-in tables
    pub fn shared() -> &'static BreadcrumbResolver {
        &DEFAULT_RESOLVER
    }

    /// All rules in precedence order: exact entries (by path), then patterns
    pub fn rules(&self) -> Vec<LabelRule> {
        let mut exact: Vec<_> = self.exact.iter().collect();
        exact.sort();

        exact
            .into_iter()
            .map(|(path, label)| LabelRule::Exact {
                path: path.clone(),
                label: label.clone(),
            })
            .chain(self.patterns.iter().cloned())
            .collect()
    }

    /// Resolve a label for a cumulative path
    pub fn label_for(&self, cumulative_path: &str, segment: &str) -> String {
        if let Some(label) = self.exact.get(cumulative_path) {
            return label.clone();
        }

        if let Some(label) = self.patterns.iter().find_map(|rule| rule.apply(cumulative_path)) {
            return label.to_string();
        }

        fallback_label(segment)
    }

    /// Resolve the trail for `current_path` as seen by `role`
    ///
    /// With a role, the trail starts with the role's home entry. When the
    /// normalized path is the home path, or is the root (`/` or empty), the
    /// home entry is the whole trail and is marked current, so the last entry
    /// is always the current one. Every other path gets one entry per
    /// segment after the home entry, including a segment whose cumulative
    /// path happens to equal the home path.
    pub fn resolve(&self, current_path: &str, role: Option<Role>) -> BreadcrumbTrail {
        let segments = split_segments(current_path);
        let normalized = join_segments(&segments);

        let mut items = Vec::with_capacity(segments.len() + 1);

        if let Some(home_path) = role.map(|r| r.home_path()) {
            let at_home = normalized == home_path || segments.is_empty();
            items.push(BreadcrumbItem::new(HOME_LABEL, home_path, at_home));
            if at_home {
                debug!(path = %normalized, role = ?role, "resolved home breadcrumb");
                return BreadcrumbTrail {
                    requested_path: current_path.to_string(),
                    role,
                    items,
                };
            }
        }

        let mut cumulative = String::new();
        for (idx, segment) in segments.iter().enumerate() {
            cumulative.push('/');
            cumulative.push_str(segment);

            let is_last = idx + 1 == segments.len();
            let label = self.label_for(&cumulative, segment);
            items.push(BreadcrumbItem::new(label, cumulative.clone(), is_last));
        }

        debug!(path = %normalized, role = ?role, entries = items.len(), "resolved breadcrumb trail");

        BreadcrumbTrail {
            requested_path: current_path.to_string(),
            role,
            items,
        }
    }
}

/// Resolve a trail with the shared built-in resolver
pub fn resolve(current_path: &str, role: Option<Role>) -> BreadcrumbTrail {
    BreadcrumbResolver::shared().resolve(current_path, role)
}

/// Normalize a path to its absolute slash-separated form
pub fn normalize_path(path: &str) -> String {
    join_segments(&split_segments(path))
}

/// Split a path into non-empty segments, ignoring query and fragment
fn split_segments(path: &str) -> Vec<&str> {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    path[..end].split('/').filter(|s| !s.is_empty()).collect()
}

fn join_segments(segments: &[&str]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }
    segments.iter().fold(String::new(), |mut acc, s| {
        acc.push('/');
        acc.push_str(s);
        acc
    })
}

/// Uppercase the first character and turn hyphens into spaces
fn fallback_label(segment: &str) -> String {
    let spaced = segment.replace('-', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(trail: &BreadcrumbTrail) -> Vec<&str> {
        trail.items.iter().map(|i| i.label.as_str()).collect()
    }

    #[test]
    fn test_student_history_route() {
        let trail = resolve("/personal/alunos/42/historico", Some(Role::Personal));

        assert_eq!(
            labels(&trail),
            vec!["Início", "Personal", "Alunos", "Detalhes do Aluno", "Histórico do Aluno"]
        );
        assert_eq!(
            trail.items.last().unwrap(),
            &BreadcrumbItem::new("Histórico do Aluno", "/personal/alunos/42/historico", true)
        );
        assert_eq!(trail.items[0].path, "/personal/dashboard");
        assert!(!trail.items[0].is_current);
    }

    #[test]
    fn test_unknown_route_falls_back() {
        let trail = resolve("/unknown-route", Some(Role::Admin));

        assert_eq!(labels(&trail), vec!["Início", "Unknown route"]);
        let last = trail.items.last().unwrap();
        assert_eq!(last.path, "/unknown-route");
        assert!(last.is_current);
    }

    #[test]
    fn test_only_last_entry_is_current() {
        for path in [
            "/admin/personais/abc",
            "//personal//treinos/7/editar/",
            "/aluno/treinos/1?tab=semana",
            "/a-b/c-d/e",
        ] {
            let trail = resolve(path, Some(Role::Aluno));
            let (last, rest) = trail.items.split_last().unwrap();
            assert!(last.is_current, "{path}");
            assert_eq!(last.path, normalize_path(path));
            assert!(rest.iter().all(|i| !i.is_current), "{path}");
        }
    }

    #[test]
    fn test_exact_label_beats_pattern() {
        let trail = resolve("/personal/alunos/novo", None);
        assert_eq!(labels(&trail), vec!["Personal", "Alunos", "Novo Aluno"]);
    }

    #[test]
    fn test_exercise_edit_pattern() {
        let trail = resolve("/personal/exercicios/99/editar", None);
        assert_eq!(trail.items.last().unwrap().label, "Editar Exercício");
        // `/personal/exercicios/99` matches no rule
        assert_eq!(trail.items[2].label, "99");
    }

    #[test]
    fn test_home_path_is_single_current_entry() {
        let trail = resolve("/admin/dashboard", Some(Role::Admin));
        assert_eq!(
            trail.items,
            vec![BreadcrumbItem::new("Início", "/admin/dashboard", true)]
        );
    }

    #[test]
    fn test_home_segment_kept_below_home() {
        let trail = resolve("/admin/dashboard/graficos", Some(Role::Admin));
        assert_eq!(labels(&trail), vec!["Início", "Admin", "Dashboard", "Graficos"]);
        assert_eq!(trail.items[2].path, "/admin/dashboard");
        assert!(!trail.items[0].is_current);
        assert!(!trail.items[2].is_current);
        assert!(trail.items[3].is_current);
    }

    #[test]
    fn test_no_role_has_no_home() {
        let trail = resolve("/aluno/historico", None);
        assert_eq!(labels(&trail), vec!["Aluno", "Histórico"]);
        assert!(trail.role.is_none());
    }

    #[test]
    fn test_root_path() {
        let with_role = resolve("/", Some(Role::Personal));
        assert_eq!(with_role.items.len(), 1);
        assert_eq!(with_role.items[0].path, Role::Personal.home_path());
        assert!(with_role.items[0].is_current);

        let empty = resolve("", Some(Role::Aluno));
        assert_eq!(labels(&empty), vec![HOME_LABEL]);
        assert!(empty.items[0].is_current);

        assert!(resolve("", None).is_empty());
    }

    #[test]
    fn test_fallback_label() {
        assert_eq!(fallback_label("unknown-route"), "Unknown route");
        assert_eq!(fallback_label("évolução-física"), "Évolução física");
        assert_eq!(fallback_label("a--b"), "A  b");
        assert_eq!(fallback_label(""), "");
    }

    #[test]
    fn test_config_extends_tables() {
        let config = BreadcrumbConfig::default()
            .with_label("/personal/agenda", "Agenda")
            .with_label("/personal", "Área do Personal")
            .with_pattern(r"^/personal/agenda/[^/]+$", "Sessão");
        let resolver = BreadcrumbResolver::with_config(&config).unwrap();

        let trail = resolver.resolve("/personal/agenda/12", Some(Role::Personal));
        assert_eq!(
            labels(&trail),
            vec!["Início", "Área do Personal", "Agenda", "Sessão"]
        );
    }

    #[test]
    fn test_invalid_config_pattern() {
        let config = BreadcrumbConfig::default().with_pattern("^/(unclosed", "X");
        assert!(matches!(
            BreadcrumbResolver::with_config(&config),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_rules_in_precedence_order() {
        let rules = BreadcrumbResolver::new().rules();
        assert_eq!(rules.len(), STATIC_LABELS.len() + DYNAMIC_ROUTES.len());
        assert!(matches!(rules.first(), Some(LabelRule::Exact { .. })));
        assert!(matches!(rules.last(), Some(LabelRule::Pattern { .. })));
        assert_eq!(rules[0].apply("/admin"), Some("Admin"));
        assert_eq!(rules.last().unwrap().apply("/aluno/treinos/5"), Some("Treino"));
    }

    #[test]
    fn test_builtin_patterns_compile() {
        assert_eq!(BreadcrumbResolver::new().patterns.len(), DYNAMIC_ROUTES.len());
    }
}
