use std::{fs, path::PathBuf};

use ts_rs::TS;

fn generate_types_content() -> String {
    let decls = [
        db::models::initiative::InitiativeStatus::decl(),
        db::models::initiative::Initiative::decl(),
        db::models::initiative::CreateInitiative::decl(),
        db::models::initiative::UpdateInitiative::decl(),
        db::models::project::ProjectStatus::decl(),
        db::models::project::Project::decl(),
        db::models::project::CreateProject::decl(),
        db::models::project::UpdateProject::decl(),
        db::models::milestone::MilestoneStatus::decl(),
        db::models::milestone::Milestone::decl(),
        db::models::milestone::CreateMilestone::decl(),
        db::models::milestone::UpdateMilestone::decl(),
        db::models::deliverable::DeliverableStatus::decl(),
        db::models::deliverable::DeliverablePriority::decl(),
        db::models::deliverable::Deliverable::decl(),
        db::models::deliverable::CreateDeliverable::decl(),
        db::models::deliverable::UpdateDeliverable::decl(),
        db::models::user::User::decl(),
        db::models::user::CreateUser::decl(),
        db::models::user::UpdateUser::decl(),
        db::models::team::Team::decl(),
        db::models::team::CreateTeam::decl(),
        db::models::team::TeamRole::decl(),
        db::models::team::TeamMember::decl(),
        db::models::team::AddTeamMember::decl(),
        db::models::comment::Comment::decl(),
        db::models::comment::CreateComment::decl(),
        db::models::notification::NotificationType::decl(),
        db::models::notification::Notification::decl(),
        db::models::entity_type::EntityType::decl(),
        db::models::favorite::Favorite::decl(),
        db::models::favorite::ToggleFavorite::decl(),
        db::models::team_vocabulary::TeamStatus::decl(),
        db::models::team_vocabulary::TeamLabel::decl(),
        db::models::team_vocabulary::TeamPriority::decl(),
        db::models::team_vocabulary::CreateVocabularyEntry::decl(),
        db::cascade::DeletePolicy::decl(),
        services::services::assignment::AssignDeliverable::decl(),
        server::routes::comments::DeletedComments::decl(),
        server::routes::notifications::NotificationCount::decl(),
        server::routes::favorites::FavoriteState::decl(),
        server::routes::health::HealthStatus::decl(),
        utils::response::ApiResponse::<()>::decl(),
    ];

    let body = decls
        .into_iter()
        .map(|decl| format!("export {decl}"))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "// This file was generated by `generate_types`. Do not edit it by hand.\n\n{body}\n"
    )
}

fn main() {
    let shared = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../shared");
    let check = std::env::args().any(|arg| arg == "--check");
    let path = shared.join("types.ts");
    let content = generate_types_content();

    if check {
        let current = fs::read_to_string(&path).unwrap_or_default();
        if current == content {
            println!("✅ shared/types.ts is up to date.");
            std::process::exit(0);
        }
        eprintln!("❌ shared/types.ts is out of date. Run `cargo run --bin generate_types`.");
        std::process::exit(1);
    }

    if let Err(e) = fs::create_dir_all(&shared).and_then(|_| fs::write(&path, content)) {
        eprintln!("Failed to write {}: {e}", path.display());
        std::process::exit(1);
    }
    println!("✅ TypeScript types generated in shared/types.ts");
}
