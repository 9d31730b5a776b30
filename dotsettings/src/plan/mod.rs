//! Resolution plans and their cache.
//!
//! A plan records, for every field of a schema tree, which env-name to read
//! and how to convert what is found. Plans hold no values, so one plan
//! serves every later resolution of the same schema under the same naming
//! options regardless of how the environment changes.

mod field;

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::debug;

pub use field::{FieldPlan, Strategy};

use crate::names::{NameRules, normalize_key};
use crate::schema::{OverridePrefix, Schema, SchemaId, SettingsOptions};

/// Precomputed strategy for resolving one schema.
#[derive(Debug, Clone)]
pub struct ResolutionPlan {
    schema: SchemaId,
    schema_name: String,
    fields: Vec<FieldPlan>,
}

impl ResolutionPlan {
    /// Build a plan for `schema` under the naming rules in `options`.
    ///
    /// Nested schemas are planned inline; their own options are ignored.
    #[must_use]
    pub fn build(schema: &Schema, options: &SettingsOptions) -> Self {
        let rules = NameRules::from_options(options);
        Self {
            schema: schema.id(),
            schema_name: schema.name().to_owned(),
            fields: field::plan_fields(schema, rules, &[], &[]),
        }
    }

    /// Identity of the schema this plan was built from.
    #[must_use]
    pub const fn schema_id(&self) -> SchemaId {
        self.schema
    }

    /// Name of the root schema.
    #[must_use]
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Top-level field plans in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldPlan] {
        &self.fields
    }
}

/// Options that influence a plan. Env files, encoding and diagnostics do not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PlanKey {
    schema: SchemaId,
    prefix: String,
    delimiter: Option<String>,
    case_sensitive: bool,
    override_prefix: OverridePrefix,
}

impl PlanKey {
    fn new(schema: &Schema, options: &SettingsOptions) -> Self {
        let case_sensitive = options.is_case_sensitive();
        Self {
            schema: schema.id(),
            prefix: normalize_key(options.prefix_str(), case_sensitive).into_owned(),
            delimiter: options.delimiter().map(str::to_owned),
            case_sensitive,
            override_prefix: options.override_policy(),
        }
    }
}

/// Counters describing plan cache activity since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionCacheStats {
    /// Requests answered with an existing plan.
    pub hits: u64,
    /// Plans computed.
    pub builds: u64,
}

/// Shared cache of [`ResolutionPlan`]s keyed by schema identity and naming
/// options.
///
/// Concurrent first requests for the same key may each compute a plan, but
/// only the first one stored is ever handed out.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    plans: RwLock<HashMap<PlanKey, Arc<ResolutionPlan>>>,
    hits: AtomicU64,
    builds: AtomicU64,
}

impl ResolutionCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The plan for `schema` under `options`, built on first request.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use dotsettings::{FieldDescriptor, FieldKind, ResolutionCache, Schema, SettingsOptions};
    ///
    /// let schema = Schema::builder("App")
    ///     .field(FieldDescriptor::new("port", FieldKind::Int))
    ///     .build();
    /// let cache = ResolutionCache::new();
    /// let options = SettingsOptions::new().prefix("APP_");
    ///
    /// let first = cache.plan_for(&schema, &options);
    /// let second = cache.plan_for(&schema, &options);
    /// assert!(Arc::ptr_eq(&first, &second));
    /// assert_eq!(first.fields()[0].candidates(), ["APP_PORT"]);
    /// ```
    #[must_use]
    pub fn plan_for(&self, schema: &Schema, options: &SettingsOptions) -> Arc<ResolutionPlan> {
        let key = PlanKey::new(schema, options);
        if let Some(plan) = self.plans.read().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Arc::clone(plan);
        }

        let built = Arc::new(ResolutionPlan::build(schema, options));
        self.builds.fetch_add(1, Ordering::Relaxed);
        debug!(
            schema = schema.name(),
            fields = built.fields().len(),
            prefix = options.prefix_str(),
            "built resolution plan"
        );
        Arc::clone(self.plans.write().entry(key).or_insert(built))
    }

    /// Activity counters.
    #[must_use]
    pub fn stats(&self) -> ResolutionCacheStats {
        ResolutionCacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            builds: self.builds.load(Ordering::Relaxed),
        }
    }

    /// Number of cached plans.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plans.read().len()
    }

    /// Whether no plan has been cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plans.read().is_empty()
    }
}
