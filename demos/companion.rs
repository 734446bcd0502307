use ollo::avatar::AvatarView;
use ollo::playlist::{PlaylistPlayer, format_time, parse_manifest, write_manifest};
use ollo::{OlloSettings, RigAsset};

/// Usage: `cargo run --example companion -- <source.json> <target.json> [song dir] [settings.json]`
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let source_path = args.next().unwrap_or_else(|| "assets/mocap.json".to_string());
    let target_path = args.next().unwrap_or_else(|| "assets/ollo.json".to_string());
    let song_dir = args.next().unwrap_or_else(|| "public/song".to_string());
    let settings = match args.next() {
        Some(path) => OlloSettings::from_json_file(path)?,
        None => OlloSettings::default(),
    };

    let source = RigAsset::load(&source_path)?;
    let target = RigAsset::load(&target_path)?;
    println!(
        "Loaded '{}' ({} joints, {} clips) and '{}' ({} joints)",
        source.name,
        source.skeleton.len(),
        source.clips.len(),
        target.name,
        target.skeleton.len()
    );

    let mut view = AvatarView::mount(source, target, &settings.avatar, || println!("Avatar ready"));
    println!(
        "Mapped {} joints, playing {:?} clips",
        view.name_map().len(),
        view.selection().origin
    );

    let dt = 1.0 / 60.0;
    for _ in 0..120 {
        view.frame(dt);
    }
    println!("After 2s: {:?}, playing {:?}", view.playback_state(), view.playing_action_names());

    view.unmount();
    for _ in 0..60 {
        view.frame(dt);
    }
    println!("After unmount: {:?}", view.playback_state());

    let playlist = match write_manifest(&song_dir)? {
        Some(path) => parse_manifest(&std::fs::read(path)?, &settings.playlist.base_url),
        None => Vec::new(),
    };
    let mut player = PlaylistPlayer::new(playlist, &settings.playlist);
    player.toggle_play();
    for track in player.tracks() {
        println!("  {} -> {}", track.title, track.src);
    }
    println!(
        "Now playing: {} [{} / {}]",
        player.current().title,
        format_time(player.current_time()),
        format_time(player.duration())
    );

    Ok(())
}
