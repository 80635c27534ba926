use indicatif::{ProgressBar, ProgressStyle};

pub(crate) fn create_progress_bar(total_blocks: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total_blocks);

    if let Ok(style) = ProgressStyle::default_bar().template(
        "[{spinner:.green} {elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} blocks ({percent}%) {msg}",
    ) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(msg.to_owned());

    pb
}

/// Progress callback for block walks, creating the bar once the total is known
pub(crate) fn block_progress(enabled: bool, msg: &str) -> impl FnMut(usize, usize) + '_ {
    let mut bar: Option<ProgressBar> = None;
    move |done, total| {
        if !enabled {
            return;
        }
        let pb = bar.get_or_insert_with(|| create_progress_bar(total as u64, msg));
        pb.set_position(done as u64);
        if done == total {
            pb.finish();
        }
    }
}
