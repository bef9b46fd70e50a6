use super::*;

fn base_request() -> SpawnRequest {
    SpawnRequest {
        task_id: "ov-abc1".to_string(),
        capability: Capability::Builder,
        agent_name_override: None,
        spec_path: None,
        file_scope: Vec::new(),
        expertise_domains: Vec::new(),
        preloaded_expertise: None,
        parent_agent: None,
        depth: 0,
        skip_scout: false,
        skip_review: false,
        max_sub_agents_override: None,
        skip_task_check: false,
        force_hierarchy: false,
        runtime_override: None,
    }
}

#[test]
fn resolve_agent_name_combines_capability_and_task_suffix() {
    assert_eq!(base_request().resolve_agent_name(), "builder-abc1");
}

#[test]
fn resolve_agent_name_prefers_explicit_override() {
    let mut request = base_request();
    request.agent_name_override = Some("my-custom-name".to_string());
    assert_eq!(request.resolve_agent_name(), "my-custom-name");
}

#[test]
fn resolve_agent_name_falls_back_to_full_task_id_without_prefix() {
    let mut request = base_request();
    request.task_id = "issue-42".to_string();
    assert_eq!(request.resolve_agent_name(), "builder-issue-42");
}
