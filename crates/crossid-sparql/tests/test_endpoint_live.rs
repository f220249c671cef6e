//! Live-endpoint smoke test.
//!
//! Run with:
//!   CROSSID_SPARQL_ENDPOINT=https://… \
//!   cargo test --package crossid-sparql --test test_endpoint_live -- --ignored --nocapture

use crossid_sparql::seealso::RelationSource;
use crossid_sparql::SparqlClient;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .try_init();
}

#[tokio::test]
#[ignore]
async fn test_expand_against_live_endpoint() -> anyhow::Result<()> {
    init_tracing();
    let endpoint = std::env::var("CROSSID_SPARQL_ENDPOINT")
        .expect("set CROSSID_SPARQL_ENDPOINT to run the live test");
    let client = SparqlClient::new(&endpoint)?;

    // KRAS: a well-connected gene record on any identifiers.org-backed store.
    let level = client.expand("ncbigene", "3845").await?;
    println!("expansion produced {} namespaces", level.len());
    for result in &level {
        println!("  {} ({} ids)", result.name, result.value);
        assert_eq!(result.value, result.ids.len());
    }
    Ok(())
}

#[tokio::test]
#[ignore]
async fn test_convert_against_live_endpoint() -> anyhow::Result<()> {
    init_tracing();
    let endpoint = std::env::var("CROSSID_SPARQL_ENDPOINT")
        .expect("set CROSSID_SPARQL_ENDPOINT to run the live test");
    let client = SparqlClient::new(&endpoint)?;

    let route = vec!["ncbigene".to_string(), "hgnc".to_string()];
    let ids = vec!["3845".to_string()];
    let rows = client.convert_full(&route, &ids, 100).await?;
    println!("conversion returned {} rows", rows.len());
    for row in &rows {
        assert_eq!(row.len(), route.len());
    }

    let total = client.count(&route, &ids).await?;
    println!("total complete chains: {total}");
    Ok(())
}
