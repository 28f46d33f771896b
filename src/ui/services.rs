//! Desktop stand-ins for the update server, the soundtrack download and the
//! host application.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use std::thread;

use serde::Deserialize;

use crate::engine::{
    DownloadState, MusicDownload, Platform, RenderMethod, UpdateCheck, UpdateCheckState, WindowMode,
};

// ── Update check ──

/// Seconds spent "waiting" before the feed is consulted.
const UPDATE_RESPONSE_DELAY: f32 = 1.5;
pub const RELEASES_FILE: &str = "releases.toml";

#[derive(Debug, thiserror::Error)]
enum FeedError {
    #[error("no release feed configured")]
    Missing,
    #[error("could not read release feed: {0}")]
    Read(#[from] io::Error),
    #[error("release feed parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Default, Deserialize)]
struct ReleaseFeed {
    #[serde(default)]
    release: Vec<Release>,
}

#[derive(Clone, Debug, Deserialize)]
struct Release {
    /// 0 = stable, 1 = preview. Preview users are offered stable builds too.
    #[serde(default)]
    channel: i32,
    build: u32,
    #[serde(default)]
    url: Option<String>,
}

/// Build number of this binary, packed like release builds: one byte each
/// for major, minor and patch.
fn build_number(version: &str) -> u32 {
    version
        .split('.')
        .take(3)
        .map(|part| part.parse::<u32>().unwrap_or(0).min(0xff))
        .fold(0, |acc, part| acc << 8 | part)
        << 8
}

/// Answers update queries from a local release feed file. Without a
/// readable feed the query fails like an unreachable server.
#[derive(Debug)]
pub struct LocalUpdateCheck {
    feed: Option<PathBuf>,
    current_build: u32,
    state: UpdateCheckState,
    waited: f32,
    release_channel: i32,
    newest: Option<Release>,
}

impl LocalUpdateCheck {
    pub fn new(feed: Option<PathBuf>) -> Self {
        LocalUpdateCheck {
            feed,
            current_build: build_number(env!("CARGO_PKG_VERSION")),
            state: UpdateCheckState::Inactive,
            waited: 0.0,
            release_channel: 0,
            newest: None,
        }
    }

    pub fn update(&mut self, dt: f32) {
        match self.state {
            UpdateCheckState::SendQuery => {
                self.state = UpdateCheckState::WaitingForResponse;
                self.waited = 0.0;
            }
            UpdateCheckState::WaitingForResponse => {
                self.waited += dt;
                if self.waited < UPDATE_RESPONSE_DELAY {
                    return;
                }
                match self.read_feed() {
                    Ok(feed) => {
                        self.newest = feed
                            .release
                            .into_iter()
                            .filter(|r| r.channel <= self.release_channel)
                            .max_by_key(|r| r.build);
                        log::debug!("update check answered: newest {:?}", self.newest);
                        self.state = UpdateCheckState::HasResponse;
                    }
                    Err(err) => {
                        log::warn!("update check failed: {err}");
                        self.state = UpdateCheckState::Failed;
                    }
                }
            }
            _ => {}
        }
    }

    fn read_feed(&self) -> Result<ReleaseFeed, FeedError> {
        let path = self.feed.as_ref().ok_or(FeedError::Missing)?;
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }
}

impl UpdateCheck for LocalUpdateCheck {
    fn state(&self) -> UpdateCheckState {
        self.state
    }

    fn has_update(&self) -> bool {
        self.state == UpdateCheckState::HasResponse
            && self.newest.as_ref().is_some_and(|r| r.build > self.current_build)
    }

    fn available_version(&self) -> Option<u32> {
        self.newest.as_ref().map(|r| r.build)
    }

    fn update_url(&self) -> Option<String> {
        self.newest.as_ref().and_then(|r| r.url.clone())
    }

    fn start(&mut self, release_channel: i32) {
        log::debug!("update check requested on release channel {release_channel}");
        self.release_channel = release_channel;
        self.newest = None;
        self.state = UpdateCheckState::SendQuery;
    }

    fn reset(&mut self) {
        self.state = UpdateCheckState::Inactive;
        self.waited = 0.0;
        self.newest = None;
    }
}

// ── Soundtrack download ──

const DOWNLOAD_CHUNK: usize = 64 * 1024;
pub const SOUNDTRACK_FILE: &str = "remastered_soundtrack.bin";

struct Transfer {
    source: File,
    target: File,
}

/// "Downloads" the remastered soundtrack by copying it from a local
/// package directory, one chunk per frame.
pub struct LocalMusicDownload {
    source: Option<PathBuf>,
    installed: PathBuf,
    state: DownloadState,
    bytes: u64,
    transfer: Option<Transfer>,
}

impl LocalMusicDownload {
    /// `source` is the packaged soundtrack; without one the download is unsupported.
    pub fn new(source: Option<PathBuf>, data_dir: PathBuf) -> Self {
        let installed = data_dir.join(SOUNDTRACK_FILE);
        let state = if installed.is_file() { DownloadState::Loaded } else { DownloadState::ReadyForDownload };
        LocalMusicDownload { source, installed, state, bytes: 0, transfer: None }
    }

    fn partial(&self) -> PathBuf {
        self.installed.with_extension("part")
    }

    pub fn is_installed(&self) -> bool {
        self.state == DownloadState::Loaded
    }

    /// Advance a running download.
    pub fn update(&mut self) {
        let result = match self.state {
            DownloadState::Pending => self.open(),
            DownloadState::Running => self.copy_chunk(),
            _ => Ok(()),
        };
        if let Err(err) = result {
            log::warn!("soundtrack download failed: {err}");
            self.transfer = None;
            self.state = DownloadState::Failed;
        }
    }

    fn open(&mut self) -> io::Result<()> {
        let source_path = self.source.as_ref().ok_or_else(|| io::Error::other("no soundtrack source"))?;
        if let Some(dir) = self.installed.parent() {
            std::fs::create_dir_all(dir)?;
        }
        self.transfer = Some(Transfer { source: File::open(source_path)?, target: File::create(self.partial())? });
        self.bytes = 0;
        self.state = DownloadState::Running;
        Ok(())
    }

    fn copy_chunk(&mut self) -> io::Result<()> {
        let Some(transfer) = &mut self.transfer else {
            return Ok(());
        };
        let mut buf = vec![0u8; DOWNLOAD_CHUNK];
        let n = transfer.source.read(&mut buf)?;
        if n == 0 {
            transfer.target.flush()?;
            self.transfer = None;
            self.state = DownloadState::Done;
            log::info!("soundtrack download finished ({} bytes)", self.bytes);
            return Ok(());
        }
        transfer.target.write_all(&buf[..n])?;
        self.bytes += n as u64;
        Ok(())
    }
}

impl MusicDownload for LocalMusicDownload {
    fn is_supported(&self) -> bool {
        self.source.is_some()
    }

    fn state(&self) -> DownloadState {
        self.state
    }

    fn bytes_downloaded(&self) -> u64 {
        self.bytes
    }

    fn start(&mut self) {
        if self.is_supported() {
            self.state = DownloadState::Pending;
        }
    }

    /// Cancel a running download or uninstall a finished one.
    fn remove(&mut self) {
        self.transfer = None;
        for path in [self.partial(), self.installed.clone()] {
            if let Err(err) = std::fs::remove_file(&path) {
                if err.kind() != io::ErrorKind::NotFound {
                    log::warn!("cannot remove {}: {err}", path.display());
                }
            }
        }
        self.bytes = 0;
        self.state = DownloadState::ReadyForDownload;
    }

    fn apply(&mut self) {
        if self.state != DownloadState::Done {
            return;
        }
        match std::fs::rename(self.partial(), &self.installed) {
            Ok(()) => self.state = DownloadState::Loaded,
            Err(err) => {
                log::warn!("cannot install soundtrack: {err}");
                self.state = DownloadState::Failed;
            }
        }
    }
}

// ── Host application ──

/// The desktop host: remembers display choices and opens links with the
/// system browser.
#[derive(Debug)]
pub struct DesktopPlatform {
    window_mode: WindowMode,
    render_method: RenderMethod,
    frame_sync: u8,
    game_recording: i32,
    pub scripts_reloads: u32,
    pub exit_requested: bool,
}

impl DesktopPlatform {
    pub fn new(window_mode: WindowMode, render_method: RenderMethod, frame_sync: u8) -> Self {
        DesktopPlatform {
            window_mode,
            render_method,
            frame_sync,
            game_recording: 0,
            scripts_reloads: 0,
            exit_requested: false,
        }
    }

    #[cfg(test)]
    fn render_method(&self) -> RenderMethod {
        self.render_method
    }

    #[cfg(test)]
    fn frame_sync(&self) -> u8 {
        self.frame_sync
    }
}

/// Start `cmd` without blocking; a thread waits on the child so it never
/// lingers as a zombie.
fn spawn_detached(mut cmd: Command) -> io::Result<thread::JoinHandle<io::Result<ExitStatus>>> {
    let mut child = cmd.spawn()?;
    Ok(thread::spawn(move || child.wait()))
}

fn browser_command(url: &str) -> Command {
    if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", "", url]);
        cmd
    } else {
        let mut cmd = Command::new(if cfg!(target_os = "macos") { "open" } else { "xdg-open" });
        cmd.arg(url);
        cmd
    }
}

impl Platform for DesktopPlatform {
    fn open_url(&mut self, url: &str) {
        log::info!("opening {url}");
        if let Err(err) = spawn_detached(browser_command(url)) {
            log::warn!("cannot open {url}: {err}");
        }
    }

    fn window_mode(&self) -> WindowMode {
        self.window_mode
    }

    fn set_window_mode(&mut self, mode: WindowMode) {
        log::debug!("window mode -> {mode:?}");
        self.window_mode = mode;
    }

    fn switch_render_method(&mut self, method: RenderMethod) {
        log::debug!("render method {:?} -> {method:?}", self.render_method);
        self.render_method = method;
    }

    fn set_vsync_mode(&mut self, frame_sync: u8) {
        log::debug!("frame sync {} -> {frame_sync}", self.frame_sync);
        self.frame_sync = frame_sync;
    }

    fn trigger_full_scripts_reload(&mut self) {
        log::info!("script optimization changed, reloading scripts");
        self.scripts_reloads += 1;
    }

    fn rebuild_touch_controls(&mut self) {}

    fn enable_touch_config(&mut self) {
        log::debug!("touch controls are not available on desktop");
    }

    fn evaluate_game_recording(&mut self, mode: i32) {
        if mode != self.game_recording {
            log::debug!("game recording {} -> {mode}", self.game_recording);
        }
        self.game_recording = mode;
    }

    fn on_exit_options(&mut self) {
        self.exit_requested = true;
    }

    fn on_faded_out_options(&mut self) {
        log::debug!("options menu faded out");
    }

    fn is_mobile(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("retromenu-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn answer(check: &mut LocalUpdateCheck) {
        check.update(0.016);
        assert_eq!(check.state(), UpdateCheckState::WaitingForResponse);
        check.update(UPDATE_RESPONSE_DELAY);
    }

    #[test]
    fn update_check_without_feed_fails_after_waiting() {
        let mut check = LocalUpdateCheck::new(None);
        check.start(0);
        assert_eq!(check.state(), UpdateCheckState::SendQuery);
        answer(&mut check);
        assert_eq!(check.state(), UpdateCheckState::Failed);
        assert!(!check.has_update());
        check.reset();
        assert_eq!(check.state(), UpdateCheckState::Inactive);
    }

    #[test]
    fn update_check_reads_the_release_feed() {
        let dir = scratch_dir("feed");
        let feed = dir.join(RELEASES_FILE);
        std::fs::write(
            &feed,
            r#"
                [[release]]
                build = 0x0001
                url = "https://example.org/old"

                [[release]]
                channel = 1
                build = 0x7f000000
                url = "https://example.org/preview"
            "#,
        )
        .unwrap();

        let mut check = LocalUpdateCheck::new(Some(feed));
        check.start(0);
        answer(&mut check);
        assert_eq!(check.state(), UpdateCheckState::HasResponse);
        assert!(!check.has_update());
        assert_eq!(check.available_version(), Some(1));

        check.start(1);
        answer(&mut check);
        assert!(check.has_update());
        assert_eq!(check.available_version(), Some(0x7f00_0000));
        assert_eq!(check.update_url().as_deref(), Some("https://example.org/preview"));
    }

    #[test]
    fn broken_feed_fails_the_check() {
        let dir = scratch_dir("badfeed");
        let feed = dir.join(RELEASES_FILE);
        std::fs::write(&feed, "[[release]\nbuild = ").unwrap();
        let mut check = LocalUpdateCheck::new(Some(feed));
        check.start(0);
        answer(&mut check);
        assert_eq!(check.state(), UpdateCheckState::Failed);
    }

    #[test]
    fn build_numbers_pack_version_parts() {
        assert_eq!(build_number("0.3.0"), 0x0003_0000);
        assert_eq!(build_number("24.1.9"), 0x1801_0900);
        assert_eq!(build_number("1.x.3"), 0x0100_0300);
    }

    #[cfg(unix)]
    #[test]
    fn detached_children_are_reaped() {
        let waiter = spawn_detached(Command::new("true")).unwrap();
        assert!(waiter.join().unwrap().unwrap().success());
        assert!(spawn_detached(Command::new("/nonexistent/retromenu-browser")).is_err());
    }

    #[test]
    fn download_without_source_is_unsupported() {
        let dir = scratch_dir("nosource");
        let mut download = LocalMusicDownload::new(None, dir);
        assert!(!download.is_supported());
        download.start();
        assert_eq!(download.state(), DownloadState::ReadyForDownload);
    }

    #[test]
    fn download_copies_then_installs_then_removes() {
        let dir = scratch_dir("copy");
        let source = dir.join("package.bin");
        std::fs::write(&source, vec![7u8; DOWNLOAD_CHUNK + 10]).unwrap();
        let data = dir.join("data");

        let mut download = LocalMusicDownload::new(Some(source), data.clone());
        download.start();
        assert_eq!(download.state(), DownloadState::Pending);
        download.update();
        assert_eq!(download.state(), DownloadState::Running);
        download.update();
        assert_eq!(download.bytes_downloaded(), DOWNLOAD_CHUNK as u64);
        download.update();
        download.update();
        assert_eq!(download.state(), DownloadState::Done);
        assert_eq!(download.bytes_downloaded(), DOWNLOAD_CHUNK as u64 + 10);

        download.apply();
        assert!(download.is_installed());
        assert!(data.join(SOUNDTRACK_FILE).is_file());
        assert!(LocalMusicDownload::new(None, data.clone()).is_installed());

        download.remove();
        assert_eq!(download.state(), DownloadState::ReadyForDownload);
        assert!(!data.join(SOUNDTRACK_FILE).exists());
    }

    #[test]
    fn missing_source_file_fails_the_download() {
        let dir = scratch_dir("missing");
        let mut download = LocalMusicDownload::new(Some(dir.join("absent.bin")), dir);
        download.start();
        download.update();
        assert_eq!(download.state(), DownloadState::Failed);
    }

    #[test]
    fn platform_remembers_display_choices() {
        let mut platform = DesktopPlatform::new(WindowMode::Windowed, RenderMethod::OpenGlFull, 1);
        platform.set_window_mode(WindowMode::Fullscreen);
        platform.switch_render_method(RenderMethod::Software);
        platform.set_vsync_mode(3);
        platform.trigger_full_scripts_reload();
        platform.on_exit_options();
        assert_eq!(platform.window_mode(), WindowMode::Fullscreen);
        assert_eq!(platform.render_method(), RenderMethod::Software);
        assert_eq!(platform.frame_sync(), 3);
        assert_eq!(platform.scripts_reloads, 1);
        assert!(platform.exit_requested);
        assert!(!platform.is_mobile());
    }
}
