//! Serve command handler

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cli::args::ServeArgs;
use crate::cli::commands::{lesson_renderer, load_sources, math_renderer};
use crate::error::Result;
use crate::observability;
use crate::server::{SiteState, bind, parse_bind_addr, serve};
use crate::site::SiteOptions;

/// Render every lesson and serve the site until `cancel` fires.
///
/// # Errors
///
/// Returns a usage error if no lesson source is given, the first lesson
/// load error, or a server error if binding fails.
pub async fn run(args: &ServeArgs, cancel: CancellationToken) -> Result<()> {
    let addr = parse_bind_addr(&args.bind)?;

    if let Some(port) = args.metrics_port {
        observability::init_metrics(Some(port))?;
        tracing::info!(port, "Prometheus metrics endpoint started");
    }

    let lessons = load_sources(&args.source, math_renderer(&args.render))?;
    let options = SiteOptions {
        title: args.title.clone(),
        renderer: lesson_renderer(&args.render, Some(args.title.clone())),
    };
    let state = Arc::new(SiteState::new(&lessons, &options));

    let (listener, bound) = bind(&addr).await?;
    eprintln!("Serving {} lesson(s) at http://{bound}/", state.lesson_count());

    serve(listener, state, cancel).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::{LessonSource, MathBackendArg, MathFallbackArg, RenderFlags};
    use crate::error::LessonKitError;
    use crate::site::DEFAULT_SITE_TITLE;

    fn args(bind: &str, builtin: bool) -> ServeArgs {
        ServeArgs {
            source: LessonSource {
                lessons: None,
                builtin,
                strict: false,
            },
            bind: bind.to_string(),
            metrics_port: None,
            title: DEFAULT_SITE_TITLE.to_string(),
            render: RenderFlags {
                stylesheet: None,
                math: MathBackendArg::Plain,
                math_fallback: MathFallbackArg::Ignore,
            },
        }
    }

    #[tokio::test]
    async fn test_invalid_bind_address() {
        let err = run(&args("not an address", true), CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, LessonKitError::Server(_)));
    }

    #[tokio::test]
    async fn test_cancelled_before_start_returns_ok() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        run(&args("127.0.0.1:0", true), cancel).await.unwrap();
    }

    #[tokio::test]
    async fn test_requires_source() {
        let err = run(&args("127.0.0.1:0", false), CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, LessonKitError::Usage(_)));
    }
}
