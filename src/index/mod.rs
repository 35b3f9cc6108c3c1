//! Package index acquisition
//!
//! Every distribution family publishes its package list in a different
//! format; the readers in this module normalize all of them into one
//! [`PackageGraph`].

pub mod alarm;
pub mod alpine;
pub mod deb;
pub mod expr;

use crate::core::SysrootResult;
use crate::di::Transport;
use crate::graph::PackageGraph;
use alpine::AlpineIndex;
use flate2::read::{GzDecoder, MultiGzDecoder};
use std::io::BufReader;
use tracing::{debug, info};

/// One index document to fetch, with everything needed to locate it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    /// `<base>/dists/<codename>/<component>/binary-<arch>/Packages.gz`
    Debian {
        base: String,
        codename: String,
        component: String,
        arch: String,
    },
    /// `<mirror>/<arch>/<repo>/<repo>.db.tar.gz`
    Arch {
        mirror: String,
        arch: String,
        repo: String,
    },
    /// `<mirror>/v<version>/<repo>/<arch>/APKINDEX.tar.gz`
    Alpine {
        mirror: String,
        version: String,
        repo: String,
        arch: String,
    },
}

impl IndexSource {
    /// Directory URL package artifacts are relative to
    pub fn package_base(&self) -> String {
        match self {
            IndexSource::Debian { base, .. } => base.clone(),
            IndexSource::Arch { mirror, arch, repo } => format!("{}/{}/{}", mirror, arch, repo),
            IndexSource::Alpine {
                mirror,
                version,
                repo,
                arch,
            } => format!("{}/v{}/{}/{}", mirror, version, repo, arch),
        }
    }

    /// URL of the compressed index document
    pub fn index_url(&self) -> String {
        match self {
            IndexSource::Debian {
                base,
                codename,
                component,
                arch,
            } => format!(
                "{}/dists/{}/{}/binary-{}/Packages.gz",
                base, codename, component, arch
            ),
            IndexSource::Arch { repo, .. } => {
                format!("{}/{}.db.tar.gz", self.package_base(), repo)
            }
            IndexSource::Alpine { .. } => format!("{}/APKINDEX.tar.gz", self.package_base()),
        }
    }
}

/// Fetch and parse every source into one graph, in order
///
/// Later sources replace same-named records from earlier ones. Alpine
/// sources are pooled so that provided names resolve across repositories.
pub async fn build_graph(
    sources: &[IndexSource],
    transport: &dyn Transport,
) -> SysrootResult<PackageGraph> {
    let mut graph = PackageGraph::new();
    let mut alpine: Option<AlpineIndex> = None;

    for source in sources {
        let url = source.index_url();
        info!("Fetching {}", url);
        let payload = transport.fetch(&url).await?;
        let base = source.package_base();

        let count = match source {
            IndexSource::Debian { .. } => deb::parse_packages(
                BufReader::new(GzDecoder::new(payload.as_slice())),
                &base,
                &mut graph,
            )?,
            IndexSource::Arch { .. } => {
                alarm::parse_db(GzDecoder::new(payload.as_slice()), &base, &mut graph)?
            }
            IndexSource::Alpine { .. } => alpine
                .get_or_insert_with(AlpineIndex::new)
                .read_archive(MultiGzDecoder::new(payload.as_slice()), &base)?,
        };
        debug!("{}: {} packages", url, count);
    }

    if let Some(index) = alpine {
        index.into_graph(&mut graph);
    }

    info!("Package database holds {} names", graph.len());
    Ok(graph)
}
