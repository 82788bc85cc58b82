//! `medox drug` / `medox disease` — reference lookups.

use crate::context;

pub async fn drug(name: &str, interactions: bool) -> anyhow::Result<()> {
    let config = context::load_config()?;
    let session = context::authed_session(&config)?;

    let info = session.drug_info(name, interactions).await?;
    println!("Drug: {}", info.name);
    println!("Description: {}", info.description);
    println!("Dosage: {}", info.dosage);
    println!("Side effects: {}", info.side_effects);
    if let Some(interactions) = info.interactions {
        println!("Interactions: {interactions}");
    }
    Ok(())
}

pub async fn disease(name: &str, treatments: bool) -> anyhow::Result<()> {
    let config = context::load_config()?;
    let session = context::authed_session(&config)?;

    let info = session.disease_info(name, treatments).await?;
    println!("Disease: {}", info.name);
    println!("Description: {}", info.description);
    println!("Symptoms: {}", info.symptoms);
    println!("Causes: {}", info.causes);
    match info.treatments {
        Some(treatments) => println!("Treatments: {treatments}"),
        None => println!("Treatments: not available"),
    }
    Ok(())
}
