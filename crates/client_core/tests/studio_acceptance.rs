use std::{sync::Arc, time::Duration};

use client_core::{
    ContentStudio, ProgressSchedule, ProjectDraft, ProjectFilter, ProjectService, ProjectSort,
    SessionManager, SessionStore, SimulatedSubmit, StudioEvent,
};
use shared::{
    domain::{ContentType, SubscriptionTier, Tone},
    protocol::GenerationEvent,
};
use storage::Storage;

#[tokio::test]
async fn sign_in_generate_and_record_content_acceptance() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let store: Arc<dyn SessionStore> = Arc::new(storage.clone());

    let mut session = SessionManager::new(store.clone(), Duration::ZERO);
    let user = session
        .login("editor@example.com", "secret")
        .await
        .expect("login")
        .clone();
    assert_eq!(user.subscription, SubscriptionTier::Pro);

    let projects = ProjectService::new(storage.clone());
    let mut draft = ProjectDraft {
        name: "Spring campaign".to_string(),
        description: "Landing pages for the spring product line".to_string(),
        category: "ecommerce".to_string(),
        target_country: "US".to_string(),
        content_goal: 4,
        timeline: "1 month".to_string(),
        ..ProjectDraft::default()
    };
    draft.add_keyword("spring sale");
    let project = projects.create(Some(user.id), draft).await.expect("project");

    let schedule = ProgressSchedule::from_millis(200, 50, 50).expect("schedule");
    let mut studio = ContentStudio::new(
        schedule,
        Arc::new(SimulatedSubmit {
            delay: Duration::ZERO,
        }),
    )
    .expect("studio");
    let mut events = studio.subscribe_events();
    {
        let wizard = studio.wizard_mut();
        let values = wizard.values_mut().expect("editable");
        values.keyword = project.keywords[0].clone();
        values.location = project.location.clone();
        values.content_type = Some(ContentType::LandingPage);
        values.word_count = 800;
        values.tone = Some(Tone::Casual);
        values.target_audience = "Returning customers".to_string();
        values.competitor_urls = vec!["https://competitor.example/spring".to_string()];
        wizard.next();
        wizard.next();
    }
    studio.submit().await.expect("submit");

    let result = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match events.recv().await.expect("event stream") {
                StudioEvent::Generation(GenerationEvent::Completed { result }) => break result,
                StudioEvent::Generation(GenerationEvent::Cancelled) => panic!("cancelled"),
                _ => {}
            }
        }
    })
    .await
    .expect("generation finished in time");
    assert_eq!(result.seo_score, 92);
    assert_eq!(studio.progress().percent, 100.0);

    let updated = projects.record_content(project.id).await.expect("record");
    assert_eq!(updated.content_count, 1);

    let listed = projects
        .list(Some(user.id), &ProjectFilter::default(), ProjectSort::RecentlyUpdated)
        .await
        .expect("list");
    assert_eq!(listed.len(), 1);

    let mut restored = SessionManager::new(store.clone(), Duration::ZERO);
    assert!(restored.restore().await.expect("restore").is_some());
    restored.logout().await.expect("logout");

    let mut after_logout = SessionManager::new(store, Duration::ZERO);
    assert!(after_logout.restore().await.expect("restore").is_none());
}
