use chrono::{DateTime, Duration, Utc};
use collection_renderer::web::ApiState;
use collection_renderer::{CollectionDescriptor, MemoryDataset, PaginatedCollectionRenderer, Record, Result};
use uuid::Uuid;

const SERVICE_LABELS: [&str; 4] = ["mysql", "postgres", "redis", "rabbitmq"];
const PLAN_NAMES: [&str; 3] = ["small", "medium", "large"];
const EVENT_STATES: [&str; 3] = ["CREATED", "UPDATED", "DELETED"];

/// Total rows a single usage-event listing may reach into.
const USAGE_EVENTS_MAX_TOTAL_RESULTS: u32 = 1000;

// Stable guids so restarts serve the same links.
fn guid(kind: &str, n: usize) -> String {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("{kind}-{n}").as_bytes()).to_string()
}

fn created(base: DateTime<Utc>, n: usize) -> DateTime<Utc> {
    base - Duration::minutes(n as i64)
}

pub fn seed_catalog(renderer: PaginatedCollectionRenderer<Record>, count: usize) -> Result<ApiState> {
    let now = Utc::now();

    let organizations = MemoryDataset::new();
    for n in 0..count {
        let spaces = (0..2)
            .map(|s| {
                Record::created_at("spaces", guid("space", n * 2 + s), created(now, n))
                    .attr("name", format!("space-{n}-{s}"))
            })
            .collect();
        organizations.insert(
            Record::created_at("organizations", guid("org", n), created(now, n))
                .attr("name", format!("org-{n:03}"))
                .attr("status", if n % 5 == 4 { "suspended" } else { "active" })
                .to_many("spaces", spaces),
        )?;
    }

    let services = MemoryDataset::new();
    let service_plans = MemoryDataset::new();
    for (s, label) in SERVICE_LABELS.iter().enumerate() {
        let service = Record::created_at("services", guid("service", s), created(now, s))
            .attr("label", *label)
            .attr("description", format!("Managed {label}"))
            .attr("active", true);

        let plans: Vec<Record> = PLAN_NAMES
            .iter()
            .enumerate()
            .map(|(p, name)| {
                let n = s * PLAN_NAMES.len() + p;
                Record::created_at("service_plans", guid("plan", n), created(now, n))
                    .attr("name", *name)
                    .attr("free", p == 0)
                    .attr("price", p as i64 * 25)
                    .attr("service_guid", service.guid.clone())
                    .to_one("service", Some(service.clone()))
            })
            .collect();

        for plan in &plans {
            service_plans.insert(plan.clone())?;
        }
        services.insert(service.to_many("service_plans", plans))?;
    }

    let usage_events = MemoryDataset::new();
    for n in 0..count.saturating_mul(4) {
        usage_events.insert(
            Record::created_at("service_usage_events", guid("event", n), created(now, n))
                .attr("state", EVENT_STATES[n % EVENT_STATES.len()])
                .attr("organization_guid", guid("org", n % count.max(1)))
                .attr("service_plan_guid", guid("plan", n % (SERVICE_LABELS.len() * PLAN_NAMES.len())))
                .attr("service_label", SERVICE_LABELS[n % SERVICE_LABELS.len()]),
        )?;
    }

    Ok(ApiState::new(renderer)
        .register(
            CollectionDescriptor::new("organizations")
                .sortable(["name", "created_at"])
                .queryable(["name", "status"]),
            organizations,
        )
        .register(
            CollectionDescriptor::new("services")
                .sortable(["label", "created_at"])
                .queryable(["label", "active"]),
            services,
        )
        .register(
            CollectionDescriptor::new("service_plans")
                .sortable(["name", "price", "created_at"])
                .queryable(["name", "service_guid", "free", "price"]),
            service_plans,
        )
        .register(
            CollectionDescriptor::new("service_usage_events")
                .sortable(["created_at"])
                .queryable(["organization_guid", "service_plan_guid", "state", "created_at"])
                .max_total_results(USAGE_EVENTS_MAX_TOTAL_RESULTS),
            usage_events,
        ))
}
