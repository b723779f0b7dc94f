//! PCM extraction and hashing.

/// Finds the `data` chunk of a WAV file.
///
/// Used to compare files by audio content only.
///
/// # Returns
/// The PCM bytes, or `None` if the file is not a RIFF/WAVE file or has no
/// complete data chunk.
pub fn extract_pcm_data(wav_data: &[u8]) -> Option<&[u8]> {
    if wav_data.len() < 12 || &wav_data[0..4] != b"RIFF" || &wav_data[8..12] != b"WAVE" {
        return None;
    }

    let mut pos = 12;
    while pos + 8 <= wav_data.len() {
        let id = &wav_data[pos..pos + 4];
        let size_bytes: [u8; 4] = wav_data[pos + 4..pos + 8].try_into().ok()?;
        let size = u32::from_le_bytes(size_bytes) as usize;
        let body = pos + 8;

        if id == b"data" {
            return wav_data.get(body..body.checked_add(size)?);
        }

        // chunks are word aligned
        pos = body.checked_add(size)?.checked_add(size % 2)?;
    }

    None
}

/// BLAKE3 hash of a WAV file's PCM data.
pub fn compute_pcm_hash(wav_data: &[u8]) -> Option<String> {
    extract_pcm_data(wav_data).map(|pcm| blake3::hash(pcm).to_hex().to_string())
}
