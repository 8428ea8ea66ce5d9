use anyhow::{anyhow, Result};
use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;

/// XLM-RoBERTa `<pad>` token id.
pub const PAD_ID: u32 = 1;

/// Tokenize a batch into `(input_ids, attention_mask)`, both `[B, T]`.
///
/// `T` is the longest encoding in the batch, capped at `max_len`; shorter
/// sequences are padded with `PAD_ID` and a zero mask.
pub fn tokenize_batch(tokenizer: &Tokenizer, texts: &[String], max_len: usize, device: &Device) -> Result<(Tensor, Tensor)> {
    let mut encoded = Vec::with_capacity(texts.len());
    for text in texts {
        let enc = tokenizer.encode(text.as_str(), true).map_err(|e| anyhow!("Tokenization failed: {}", e))?;
        let mut ids = enc.get_ids().to_vec();
        let mut mask = enc.get_attention_mask().to_vec();
        ids.truncate(max_len);
        mask.truncate(max_len);
        encoded.push((ids, mask));
    }
    let seq_len = encoded.iter().map(|(ids, _)| ids.len()).max().unwrap_or(0).max(1);

    let mut all_ids = Vec::with_capacity(texts.len() * seq_len);
    let mut all_mask = Vec::with_capacity(texts.len() * seq_len);
    for (mut ids, mut mask) in encoded {
        let pad = seq_len - ids.len();
        ids.extend(std::iter::repeat(PAD_ID).take(pad));
        mask.extend(std::iter::repeat(0).take(pad));
        all_ids.extend(ids);
        all_mask.extend(mask);
    }
    let input_ids = Tensor::from_iter(all_ids, device)?.reshape((texts.len(), seq_len))?;
    let attention_mask = Tensor::from_iter(all_mask, device)?.reshape((texts.len(), seq_len))?;
    Ok((input_ids, attention_mask))
}
