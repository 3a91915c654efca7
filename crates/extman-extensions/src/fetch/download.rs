use super::unpack::{archive_filename, gem_base_name, is_gzip, parse_gem_unpack_output, parse_tar_listing};
use super::{remove_stale, FetchContext};
use crate::runner::CommandSpec;
use extman_core::{Error, Result};
use futures_util::StreamExt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Archive formats a download can be unpacked from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// Ruby gem, installed and unpacked through the `gem` tool
    Gem,
    /// Tar archive, optionally gzip-compressed
    Tarball { gzip: bool },
    Zip,
}

impl ArchiveFormat {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Gem => "Gem",
            Self::Tarball { .. } => "Tarball",
            Self::Zip => "Zip",
        }
    }
}

/// Archive download followed by a format-specific unpack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub format: ArchiveFormat,
    pub url: String,
    pub name: String,
}

impl Download {
    pub fn gem(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            format: ArchiveFormat::Gem,
            url: url.into(),
            name: name.into(),
        }
    }

    /// Tarball download; gzip is detected from the archive file name
    pub fn tarball(url: impl Into<String>, name: impl Into<String>) -> Self {
        let url = url.into();
        let gzip = archive_filename(&url)
            .map(|file| is_gzip(&file))
            .unwrap_or(false);
        Self {
            format: ArchiveFormat::Tarball { gzip },
            url,
            name: name.into(),
        }
    }

    pub fn zip(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            format: ArchiveFormat::Zip,
            url: url.into(),
            name: name.into(),
        }
    }

    /// Local file name of the downloaded archive
    pub fn filename(&self) -> Result<String> {
        archive_filename(&self.url)
    }

    /// Download and unpack, returning the unpacked directory
    pub async fn acquire(&self, ctx: &FetchContext) -> Result<PathBuf> {
        ctx.ensure_work_dir()?;
        let filename = self.filename()?;

        match self.format {
            ArchiveFormat::Gem => self.acquire_gem(ctx, &filename).await,
            ArchiveFormat::Tarball { .. } | ArchiveFormat::Zip => {
                let archive = self.download(ctx, &filename).await?;
                let result = self.unpack(ctx, &filename).await;
                discard_archive(&archive);
                result
            }
        }
    }

    /// Stream the archive into `<work-dir>/<filename>`
    pub async fn download(&self, ctx: &FetchContext, filename: &str) -> Result<PathBuf> {
        let target = ctx.work_dir.join(filename);
        info!("Downloading {}", self.url);

        let response = ctx
            .http
            .get(&self.url)
            .timeout(ctx.download_timeout)
            .send()
            .await
            .map_err(|e| Error::fetch_failure(format!("GET {}: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::fetch_failure(format!(
                "GET {}: HTTP {}",
                self.url,
                response.status()
            )));
        }

        let mut file = fs::File::create(&target).map_err(|e| {
            Error::fetch_failure(format!("Cannot create {}: {}", target.display(), e))
        })?;

        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    drop(file);
                    discard_archive(&target);
                    return Err(Error::fetch_failure(format!(
                        "Download of {} interrupted: {}",
                        self.url, e
                    )));
                }
            };
            file.write_all(&chunk).map_err(|e| {
                Error::fetch_failure(format!("Cannot write {}: {}", target.display(), e))
            })?;
            written += chunk.len() as u64;
        }
        file.sync_all()?;

        debug!("Downloaded {} bytes to {}", written, target.display());
        Ok(target)
    }

    /// Unpack the downloaded archive and return the directory it produced
    pub async fn unpack(&self, ctx: &FetchContext, filename: &str) -> Result<PathBuf> {
        match self.format {
            ArchiveFormat::Gem => {
                let output = ctx
                    .run_tool(CommandSpec::new("gem").args(["unpack", gem_base_name(filename)]))
                    .await?;
                let path = parse_gem_unpack_output(&output.stdout)?;
                debug!("gem unpacked into {}", path.display());
                Ok(ctx.work_dir.join(path))
            }
            ArchiveFormat::Tarball { gzip } => {
                let flags = if gzip { "-xvzf" } else { "-xvf" };
                let output = ctx
                    .run_tool(CommandSpec::new("tar").args([flags, filename]))
                    .await?;
                let dir = parse_tar_listing(&output.stdout, &output.stderr)?;
                debug!("tar extracted {}", dir);
                Ok(ctx.work_dir.join(dir))
            }
            ArchiveFormat::Zip => {
                let dest = ctx.work_dir.join(&self.name);
                remove_stale(&dest)?;
                ctx.run_tool(CommandSpec::new("unzip").args([filename, "-d", self.name.as_str()]))
                    .await?;
                Ok(dest)
            }
        }
    }

    /// Gems already known to the package manager are not downloaded again
    async fn acquire_gem(&self, ctx: &FetchContext, filename: &str) -> Result<PathBuf> {
        let base = gem_base_name(filename);
        let probe = CommandSpec::new("gem").args(["list", "-i", &format!("^{}$", base)]);

        if ctx.run_tool(probe).await.is_ok() {
            debug!("gem {} already available, skipping download", base);
            return self.unpack(ctx, filename).await;
        }

        let archive = self.download(ctx, filename).await?;
        let installed = ctx
            .run_tool(CommandSpec::new("gem").args(["install", filename]))
            .await;
        let result = match installed {
            Ok(_) => self.unpack(ctx, filename).await,
            Err(e) => Err(e),
        };
        discard_archive(&archive);
        result
    }
}

fn discard_archive(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}
