//! Orchestration of one polling pass: fetch the sales, then decode,
//! render, and announce each one in order.

use thiserror::Error;
use tracing::{error, info};

use crate::metadata::{self, MetadataError};
use crate::models::notification::NotificationPayload;
use crate::models::sale::SaleEvent;
use crate::services::discord::{ChannelNotifier, NotifyError};
use crate::services::opensea::{FeedError, FeedQuery, SalesFeed};
use crate::services::renderer::{RenderError, Renderer};

/// Why one sale could not be announced. Scoped to that sale; the run
/// continues past it.
#[derive(Debug, Error)]
pub enum SaleError {
    #[error(transparent)]
    Metadata(#[from] MetadataError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

#[derive(Debug)]
pub struct SaleFailure {
    /// Name of the asset whose announcement failed.
    pub asset: String,
    pub error: SaleError,
}

/// Outcome of one run. `attempted == 0` is the normal quiet-window case.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub attempted: usize,
    pub sent: usize,
    pub failures: Vec<SaleFailure>,
}

pub struct Dispatcher<'a, F, R, N> {
    feed: &'a F,
    renderer: &'a R,
    notifier: &'a N,
}

impl<'a, F, R, N> Dispatcher<'a, F, R, N>
where
    F: SalesFeed,
    R: Renderer,
    N: ChannelNotifier,
{
    pub fn new(feed: &'a F, renderer: &'a R, notifier: &'a N) -> Self {
        Self {
            feed,
            renderer,
            notifier,
        }
    }

    /// One polling pass. A feed failure aborts the run; anything that goes
    /// wrong with a single sale is recorded in the summary and the
    /// remaining sales still go out.
    pub async fn run(
        &self,
        occurred_after: i64,
        collection_slug: &str,
        contract_address: Option<&str>,
    ) -> Result<RunSummary, FeedError> {
        let query = FeedQuery {
            occurred_after,
            collection_slug: collection_slug.to_string(),
            contract_address: contract_address.map(str::to_string),
        };
        let sales = self.feed.fetch_sales_since(&query).await?;
        if sales.is_empty() {
            info!("No recent sales");
            return Ok(RunSummary::default());
        }

        let mut summary = RunSummary {
            attempted: sales.len(),
            ..RunSummary::default()
        };
        for sale in sales {
            let asset = sale.asset.name.clone();
            match self.announce(sale).await {
                Ok(()) => {
                    summary.sent += 1;
                    info!(asset = %asset, "sale announced");
                }
                Err(err) => {
                    error!(asset = %asset, error = %err, "failed to announce sale");
                    summary.failures.push(SaleFailure { asset, error: err });
                }
            }
        }
        Ok(summary)
    }

    async fn announce(&self, sale: SaleEvent) -> Result<(), SaleError> {
        let attributes = metadata::extract_attributes(&sale.asset.token_metadata)?;
        let svg = metadata::extract_svg(&sale.asset.token_metadata)?;
        let image = self.renderer.rasterize(&svg).await?;
        let payload = NotificationPayload::compose(&sale, attributes, image);
        self.notifier.send(payload).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use base64::{engine::general_purpose, Engine as _};
    use mockall::Sequence;

    use super::*;
    use crate::metadata::{JSON_METADATA_PREFIX, SVG_IMAGE_PREFIX};
    use crate::models::raster::RasterImage;
    use crate::models::sale::{Account, Asset, Collection};
    use crate::services::discord::MockChannelNotifier;
    use crate::services::opensea::MockSalesFeed;
    use crate::services::renderer::MockRenderer;

    fn token_metadata_uri(svg: &str, attributes_json: &str) -> String {
        let svg_uri = format!(
            "{SVG_IMAGE_PREFIX}{}",
            general_purpose::STANDARD.encode(svg)
        );
        let json = format!(r#"{{"image":"{svg_uri}","attributes":{attributes_json}}}"#);
        format!(
            "{JSON_METADATA_PREFIX}{}",
            general_purpose::STANDARD.encode(json)
        )
    }

    fn sale(name: &str, token_metadata: &str) -> SaleEvent {
        SaleEvent {
            asset: Asset {
                name: name.to_string(),
                permalink: format!("https://opensea.io/assets/0xabc/{name}"),
                token_metadata: token_metadata.to_string(),
                collection: Collection {
                    image_url: "https://img.example/collection.png".to_string(),
                },
            },
            total_price: Some("1000000000000000000".to_string()),
            winner_account: Some(Account {
                address: Some("0xbuyer".to_string()),
            }),
            seller: Some(Account {
                address: Some("0xseller".to_string()),
            }),
            created_date: "2023-01-01T00:00:00.000".to_string(),
        }
    }

    fn good_sale(name: &str) -> SaleEvent {
        sale(
            name,
            &token_metadata_uri("<svg><rect/></svg>", r#"[{"trait_type":"Film","value":"Ektachrome"}]"#),
        )
    }

    #[tokio::test]
    async fn quiet_window_sends_nothing() {
        let mut feed = MockSalesFeed::new();
        feed.expect_fetch_sales_since().returning(|_| Ok(vec![]));
        let mut renderer = MockRenderer::new();
        renderer.expect_rasterize().times(0);
        let mut notifier = MockChannelNotifier::new();
        notifier.expect_send().times(0);

        let summary = Dispatcher::new(&feed, &renderer, &notifier)
            .run(1_672_531_200, "kinochromes", None)
            .await
            .expect("run");

        assert_eq!(summary.attempted, 0);
        assert_eq!(summary.sent, 0);
        assert!(summary.failures.is_empty());
    }

    #[tokio::test]
    async fn run_passes_the_window_to_the_feed() {
        let mut feed = MockSalesFeed::new();
        feed.expect_fetch_sales_since()
            .withf(|query| {
                query.occurred_after == 1_700_000_000
                    && query.collection_slug == "kinochromes"
                    && query.contract_address.as_deref() == Some("0xabc")
            })
            .returning(|_| Ok(vec![]));
        let renderer = MockRenderer::new();
        let notifier = MockChannelNotifier::new();

        Dispatcher::new(&feed, &renderer, &notifier)
            .run(1_700_000_000, "kinochromes", Some("0xabc"))
            .await
            .expect("run");
    }

    #[tokio::test]
    async fn sales_are_announced_in_feed_order() {
        let mut feed = MockSalesFeed::new();
        feed.expect_fetch_sales_since()
            .returning(|_| Ok(vec![good_sale("Kinochrome #1"), good_sale("Kinochrome #2")]));
        let mut renderer = MockRenderer::new();
        renderer
            .expect_rasterize()
            .times(2)
            .returning(|_| Ok(RasterImage::png(vec![137, 80, 78, 71])));

        let mut notifier = MockChannelNotifier::new();
        let mut order = Sequence::new();
        notifier
            .expect_send()
            .withf(|payload| payload.embed.title == "Kinochrome #1 sold!")
            .times(1)
            .in_sequence(&mut order)
            .returning(|_| Ok(()));
        notifier
            .expect_send()
            .withf(|payload| payload.embed.title == "Kinochrome #2 sold!")
            .times(1)
            .in_sequence(&mut order)
            .returning(|_| Ok(()));

        let summary = Dispatcher::new(&feed, &renderer, &notifier)
            .run(0, "kinochromes", None)
            .await
            .expect("run");

        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.sent, 2);
        assert!(summary.failures.is_empty());
    }

    #[tokio::test]
    async fn payload_carries_traits_and_artwork() {
        let mut feed = MockSalesFeed::new();
        feed.expect_fetch_sales_since()
            .returning(|_| Ok(vec![good_sale("Kinochrome #9")]));
        let mut renderer = MockRenderer::new();
        renderer
            .expect_rasterize()
            .withf(|svg| svg == "<svg><rect/></svg>")
            .returning(|_| Ok(RasterImage::png(vec![1, 2, 3])));
        let mut notifier = MockChannelNotifier::new();
        notifier
            .expect_send()
            .withf(|payload| {
                payload.image.bytes == vec![1, 2, 3]
                    && payload
                        .embed
                        .fields
                        .iter()
                        .any(|f| f.name == "Film" && f.value == "Ektachrome")
            })
            .returning(|_| Ok(()));

        Dispatcher::new(&feed, &renderer, &notifier)
            .run(0, "kinochromes", None)
            .await
            .expect("run");
    }

    #[tokio::test]
    async fn bad_metadata_does_not_block_later_sales() {
        let mut feed = MockSalesFeed::new();
        feed.expect_fetch_sales_since().returning(|_| {
            Ok(vec![
                sale("Broken #1", "https://example.com/not-a-data-uri"),
                good_sale("Kinochrome #2"),
            ])
        });
        let mut renderer = MockRenderer::new();
        renderer
            .expect_rasterize()
            .times(1)
            .returning(|_| Ok(RasterImage::png(vec![1])));
        let mut notifier = MockChannelNotifier::new();
        notifier
            .expect_send()
            .withf(|payload| payload.embed.title == "Kinochrome #2 sold!")
            .times(1)
            .returning(|_| Ok(()));

        let summary = Dispatcher::new(&feed, &renderer, &notifier)
            .run(0, "kinochromes", None)
            .await
            .expect("run");

        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.sent, 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].asset, "Broken #1");
        assert!(matches!(summary.failures[0].error, SaleError::Metadata(_)));
    }

    #[tokio::test]
    async fn render_failure_is_scoped_to_its_sale() {
        let mut feed = MockSalesFeed::new();
        feed.expect_fetch_sales_since()
            .returning(|_| Ok(vec![good_sale("Kinochrome #1"), good_sale("Kinochrome #2")]));
        let mut renderer = MockRenderer::new();
        let mut order = Sequence::new();
        renderer
            .expect_rasterize()
            .times(1)
            .in_sequence(&mut order)
            .returning(|_| Err(RenderError::EmptyImage));
        renderer
            .expect_rasterize()
            .times(1)
            .in_sequence(&mut order)
            .returning(|_| Ok(RasterImage::png(vec![1])));
        let mut notifier = MockChannelNotifier::new();
        notifier.expect_send().times(1).returning(|_| Ok(()));

        let summary = Dispatcher::new(&feed, &renderer, &notifier)
            .run(0, "kinochromes", None)
            .await
            .expect("run");

        assert_eq!(summary.sent, 1);
        assert!(matches!(summary.failures[0].error, SaleError::Render(_)));
    }

    #[tokio::test]
    async fn send_failure_is_scoped_to_its_sale() {
        let mut feed = MockSalesFeed::new();
        feed.expect_fetch_sales_since()
            .returning(|_| Ok(vec![good_sale("Kinochrome #1"), good_sale("Kinochrome #2")]));
        let mut renderer = MockRenderer::new();
        renderer
            .expect_rasterize()
            .times(2)
            .returning(|_| Ok(RasterImage::png(vec![1])));
        let mut notifier = MockChannelNotifier::new();
        let mut order = Sequence::new();
        notifier
            .expect_send()
            .times(1)
            .in_sequence(&mut order)
            .returning(|_| {
                Err(NotifyError::Send {
                    status: 500,
                    body: "upstream broke".to_string(),
                })
            });
        notifier
            .expect_send()
            .times(1)
            .in_sequence(&mut order)
            .returning(|_| Ok(()));

        let summary = Dispatcher::new(&feed, &renderer, &notifier)
            .run(0, "kinochromes", None)
            .await
            .expect("run");

        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.sent, 1);
        assert!(matches!(summary.failures[0].error, SaleError::Notify(_)));
    }

    #[tokio::test]
    async fn feed_failure_aborts_the_run() {
        let mut feed = MockSalesFeed::new();
        feed.expect_fetch_sales_since().returning(|_| {
            Err(FeedError::Status {
                status: 503,
                body: "maintenance".to_string(),
            })
        });
        let renderer = MockRenderer::new();
        let notifier = MockChannelNotifier::new();

        let err = Dispatcher::new(&feed, &renderer, &notifier)
            .run(0, "kinochromes", None)
            .await
            .expect_err("feed down");

        assert!(matches!(err, FeedError::Status { status: 503, .. }));
    }
}
