use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    MemoryOom,
    CrashLoop,
    ImagePull,
    Scheduling,
    NetworkDns,
    ArgocdSync,
    TektonPipeline,
    Crossplane,
    StoragePvc,
    Rbac,
    Configuration,
}

impl Category {
    // Taxonomy order doubles as rule priority and render order.
    pub const ALL: [Category; 11] = [
        Category::MemoryOom,
        Category::CrashLoop,
        Category::ImagePull,
        Category::Scheduling,
        Category::NetworkDns,
        Category::ArgocdSync,
        Category::TektonPipeline,
        Category::Crossplane,
        Category::StoragePvc,
        Category::Rbac,
        Category::Configuration,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MemoryOom => "Memory / OOM Issues",
            Self::CrashLoop => "Pod CrashLoopBackOff",
            Self::ImagePull => "Image Pull Errors",
            Self::Scheduling => "Pod Scheduling Issues",
            Self::NetworkDns => "Network / DNS Issues",
            Self::ArgocdSync => "ArgoCD Sync Issues",
            Self::TektonPipeline => "Tekton Pipeline Issues",
            Self::Crossplane => "Crossplane Issues",
            Self::StoragePvc => "Storage / PVC Issues",
            Self::Rbac => "RBAC / Permission Issues",
            Self::Configuration => "Configuration Issues",
        }
    }

    pub fn rank(self) -> usize {
        match self {
            Self::MemoryOom => 0,
            Self::CrashLoop => 1,
            Self::ImagePull => 2,
            Self::Scheduling => 3,
            Self::NetworkDns => 4,
            Self::ArgocdSync => 5,
            Self::TektonPipeline => 6,
            Self::Crossplane => 7,
            Self::StoragePvc => 8,
            Self::Rbac => 9,
            Self::Configuration => 10,
        }
    }
}

// First matching rule wins; the categories overlap by keyword alone, so the
// cascade order is part of the contract.
pub fn categorize(problem: &str, root_cause: &str) -> Category {
    let text = format!("{problem} {root_cause}").to_lowercase();

    if contains_any(&text, &["oom", "out of memory", "memory limit"]) {
        return Category::MemoryOom;
    }
    if contains_any(&text, &["crashloop", "crash loop", "restart"]) {
        return Category::CrashLoop;
    }
    if contains_any(&text, &["image pull", "imagepull", "errimagepull"]) {
        return Category::ImagePull;
    }
    if contains_any(&text, &["pending", "schedul", "node selector", "affinity"]) {
        return Category::Scheduling;
    }
    // "timeout" alone is too generic; it only signals a network problem next
    // to a service or endpoint mention.
    if contains_any(&text, &["dns", "network", "connection refused"])
        || (text.contains("timeout")
            && (text.contains("service") || text.contains("endpoint")))
    {
        return Category::NetworkDns;
    }
    if contains_any(&text, &["argocd", "sync"]) {
        return Category::ArgocdSync;
    }
    if contains_any(&text, &["tekton", "pipelinerun", "taskrun"]) {
        return Category::TektonPipeline;
    }
    if contains_any(&text, &["crossplane", "composition", "managed resource"]) {
        return Category::Crossplane;
    }
    if contains_any(&text, &["pvc", "persistent volume", "storageclass"]) {
        return Category::StoragePvc;
    }
    if contains_any(&text, &["rbac", "forbidden", "permission denied"]) {
        return Category::Rbac;
    }

    Category::Configuration
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::{categorize, Category};

    #[test]
    fn every_category_has_a_stable_title_and_rank() {
        for (index, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.rank(), index);
            assert!(!category.as_str().is_empty());
        }
    }

    #[test]
    fn oom_outranks_argocd_when_both_match() {
        let category = categorize("Pod was OOMKilled", "argocd sync failed afterwards");
        assert_eq!(category, Category::MemoryOom);
    }

    #[test]
    fn matching_is_case_insensitive_across_both_fields() {
        assert_eq!(categorize("", "Out Of Memory on node"), Category::MemoryOom);
        assert_eq!(categorize("ErrImagePull seen on deploy", ""), Category::ImagePull);
    }

    #[test]
    fn each_rule_matches_a_representative_phrase() {
        let cases = [
            ("container hit its memory limit", Category::MemoryOom),
            ("pod stuck in CrashLoopBackOff", Category::CrashLoop),
            ("image pull backoff from registry", Category::ImagePull),
            ("pod Pending due to node selector", Category::Scheduling),
            ("DNS lookup failures in cluster", Category::NetworkDns),
            ("connection refused from upstream", Category::NetworkDns),
            ("argocd app out of sync", Category::ArgocdSync),
            ("pipelinerun never started", Category::TektonPipeline),
            ("crossplane composition invalid", Category::Crossplane),
            ("pvc stuck terminating", Category::StoragePvc),
            ("403 forbidden from api server", Category::Rbac),
        ];
        for (text, expected) in cases {
            assert_eq!(categorize(text, ""), expected, "text: {text}");
        }
    }

    #[test]
    fn timeout_needs_a_service_or_endpoint_mention() {
        assert_eq!(categorize("request timeout to payments service", ""), Category::NetworkDns);
        assert_eq!(categorize("timeout waiting for endpoint", ""), Category::NetworkDns);
        assert_eq!(categorize("timeout during rollout", ""), Category::Configuration);
    }

    #[test]
    fn storage_wins_over_rbac_by_rule_order() {
        let category = categorize("pvc mount forbidden by policy", "");
        assert_eq!(category, Category::StoragePvc);
    }

    #[test]
    fn unmatched_text_falls_back_to_configuration() {
        assert_eq!(categorize("mislabeled deployment", "typo in env var"), Category::Configuration);
        assert_eq!(categorize("", ""), Category::Configuration);
    }
}
