//! Walks one guide through the full lifecycle against a local sled db and
//! prints the resulting audit trail.

use living_guide::{service::LivingGuideService, utils};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let db = sled::open("living-guide-demo")?;

    if !db.is_empty() {
        db.clear()?;
    }

    let service = LivingGuideService::open(Arc::new(db));

    let tenant_id = utils::new_uuid_to_bech32(utils::TENANT_HRP)?;
    let author_id = utils::new_uuid_to_bech32(utils::USER_HRP)?;
    let approver_id = utils::new_uuid_to_bech32(utils::USER_HRP)?;

    let doc = service.create(
        &tenant_id,
        "House rules",
        "Quiet hours start at 22:00.",
        &author_id,
    )?;
    let doc = service.submit(&tenant_id, &doc.id, &author_id)?;
    let doc = service.approve(&tenant_id, &doc.id, &approver_id)?;
    let doc = service.update(
        &tenant_id,
        &doc.id,
        "Quiet hours start at 23:00.",
        &author_id,
    )?;

    // bring back the approved wording as a fresh draft
    let doc = service.rollback_to(&tenant_id, &doc.id, 3, &author_id)?;

    let (doc, history) = service.get_detail_with_history(&tenant_id, &doc.id)?;
    println!("{} v{} [{}]: {}", doc.title, doc.version, doc.status, doc.content);
    for record in history {
        println!(
            "  v{} {} by {} -> {}",
            record.version, record.change, record.changed_by, record.status
        );
    }

    Ok(())
}
