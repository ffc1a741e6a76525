/*!
 * Embedded demo page: a two-column view that renders original fragments as
 * they stream in and pairs each translation with its sentence index.
 */

/// The HTML served at `GET /`
pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Real-time Streaming Translation</title>
    <style>
        body { font-family: Arial, sans-serif; margin: 40px; }
        .container { display: flex; gap: 20px; margin-top: 20px; }
        .column {
            flex: 1;
            border: 1px solid #ccc;
            padding: 20px;
            min-height: 400px;
            background: #f9f9f9;
        }
        .column h2 { margin-top: 0; }
        .original { color: #2563eb; }
        .translation { color: #16a34a; }
        .error { color: #dc2626; font-style: italic; }
        .done { font-weight: bold; color: #16a34a; }
        button {
            padding: 10px 20px;
            font-size: 16px;
            cursor: pointer;
            margin-right: 10px;
            background: #2563eb;
            color: white;
            border: none;
            border-radius: 4px;
        }
        button:hover { background: #1d4ed8; }
        input, select {
            padding: 10px;
            margin-right: 10px;
            font-size: 14px;
            border: 1px solid #ccc;
            border-radius: 4px;
        }
        #prompt { width: 400px; }
        .controls { margin-bottom: 20px; }
    </style>
</head>
<body>
    <h1>Real-time Streaming Translation</h1>

    <div class="controls">
        <input type="text" id="prompt" placeholder="Enter your prompt"
               value="Tell me a short story about a space explorer">
        <select id="language">
            <option value="Spanish">Spanish</option>
            <option value="French">French</option>
            <option value="German">German</option>
            <option value="Japanese">Japanese</option>
            <option value="Hindi">Hindi</option>
            <option value="Chinese">Chinese</option>
        </select>
        <button onclick="startStream()">Start Translation</button>
        <button onclick="clearOutput()" style="background: #6b7280;">Clear</button>
    </div>

    <div class="container">
        <div class="column">
            <h2>Original</h2>
            <div id="original"></div>
        </div>
        <div class="column">
            <h2>Translation (<span id="targetLang">Spanish</span>)</h2>
            <div id="translation"></div>
        </div>
    </div>

    <script>
        function clearOutput() {
            document.getElementById('original').innerHTML = '';
            document.getElementById('translation').innerHTML = '';
        }

        function append(parent, text, cls, index) {
            const span = document.createElement('span');
            span.textContent = text + ' ';
            span.className = cls;
            if (index !== undefined) {
                span.title = 'sentence ' + index;
                span.dataset.index = index;
            }
            parent.appendChild(span);
            parent.scrollTop = parent.scrollHeight;
        }

        function handleEvent(data, originalDiv, translationDiv) {
            if (data.type === 'original') {
                append(originalDiv, data.text, 'original');
            } else if (data.type === 'translation') {
                append(translationDiv, data.text, 'translation', data.index);
            } else if (data.type === 'error') {
                if (data.index !== undefined) {
                    append(translationDiv, '[translation ' + data.index + ' failed]', 'error', data.index);
                } else {
                    append(originalDiv, '[stream error: ' + data.message + ']', 'error');
                }
            } else if (data.type === 'done') {
                append(originalDiv, '✓ complete', 'done');
                append(translationDiv, '✓ complete', 'done');
            }
        }

        function startStream() {
            clearOutput();

            const prompt = document.getElementById('prompt').value;
            const language = document.getElementById('language').value;
            const originalDiv = document.getElementById('original');
            const translationDiv = document.getElementById('translation');

            document.getElementById('targetLang').textContent = language;

            fetch('/translate-stream', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ prompt: prompt, language: language })
            })
            .then(response => {
                if (!response.ok) {
                    return response.json().then(body => { throw new Error(body.error); });
                }
                const reader = response.body.getReader();
                const decoder = new TextDecoder();
                let buffer = '';

                function read() {
                    reader.read().then(({ done, value }) => {
                        if (done) return;

                        buffer += decoder.decode(value, { stream: true });
                        const lines = buffer.split('\n');
                        buffer = lines.pop();

                        lines.forEach(line => {
                            if (line.startsWith('data: ')) {
                                try {
                                    const data = JSON.parse(line.slice(6));
                                    handleEvent(data, originalDiv, translationDiv);
                                } catch (e) {
                                    // Skip malformed frames
                                }
                            }
                        });
                        read();
                    });
                }

                read();
            })
            .catch(error => {
                alert('Error: ' + error.message);
            });
        }
    </script>
</body>
</html>
"#;
