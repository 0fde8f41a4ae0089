use std::path::Path;

use ysent_analysis::Lexicon;
use ysent_ml_client::MlClient;
use ysent_worker::WorkerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = WorkerConfig::from_env()?;

    println!(
        "ysent-selfcheck: starting with api={} mode={} criterion={}",
        config.youtube.base_url, config.run.mode, config.run.criterion
    );
    if let Some(path) = &config.lexicon_path {
        ensure_lexicon(path)?;
    }
    if let Some(ml) = config.ml.clone() {
        ensure_model_service(MlClient::new(ml)?).await?;
    } else {
        println!("ysent-selfcheck: ML_SERVICE_URL unset, model classifier will be unavailable");
    }

    println!("ysent-selfcheck: ok");
    Ok(())
}

fn ensure_lexicon(path: &Path) -> anyhow::Result<()> {
    let lexicon = Lexicon::from_vader_file(path)?;
    if lexicon.is_empty() {
        return Err(anyhow::anyhow!("lexicon {} has no entries", path.display()));
    }
    println!("ysent-selfcheck: lexicon {} ({} entries)", path.display(), lexicon.len());
    Ok(())
}

async fn ensure_model_service(client: MlClient) -> anyhow::Result<()> {
    if !client.health_check().await? {
        return Err(anyhow::anyhow!(
            "rating model service at {} is not healthy",
            client.base_url()
        ));
    }
    Ok(())
}
